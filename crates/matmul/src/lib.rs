//! MatMul-rs library: application logic for the `matmul` binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod output;
pub mod ui;
