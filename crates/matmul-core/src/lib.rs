//! # matmul-core
//!
//! Core library for the partitioned matrix-multiplication engine: the value
//! types, the pure computation functions, and seeded matrix generation.

pub mod constants;
pub mod engine;
pub mod error;
pub mod generator;
pub mod model;
pub mod report;

// Re-exports
pub use constants::{
    exit_codes, DEFAULT_MATRIX_SIZE, DEFAULT_MAX_VALUE, DEFAULT_SERIAL_THRESHOLD,
    DEFAULT_WORKER_COUNT, SEED_FROM_CLOCK,
};
pub use engine::{build_result_matrix, build_tasks, perform_calculations, serial_multiply};
pub use error::{MatMulError, Result};
pub use generator::{generate_matrix, random_calculation, SubtractiveRng};
pub use model::{CalculationId, ComputationResult, ComputationTask, Matrix, MatrixCalculation};
pub use report::{now_millis, MatrixInfo, Report};

/// Multiply two seeded random matrices serially and summarize the product.
///
/// Convenience wrapper for quick checks; stored, multi-phase calculations go
/// through the orchestration crate instead.
///
/// # Example
/// ```
/// let info = matmul_core::multiply_seeded(50, 100, 123_321).unwrap();
/// assert_eq!(info.average, 121_672);
/// ```
pub fn multiply_seeded(size: usize, max_value: i32, seed: i64) -> Result<MatrixInfo> {
    let calculation = random_calculation(size, max_value, seed)?;
    let product = serial_multiply(&calculation)?;
    Ok(MatrixInfo::of(&product))
}
