//! # matmul-orchestration
//!
//! Calculation lifecycle over a computation store: the stateless handler,
//! report delivery, the phase context used by external drivers, and a local
//! pipeline driver that fans workers out on the rayon pool.

pub mod callback;
pub mod context;
pub mod driver;
pub mod handler;
pub mod interfaces;

pub use callback::{HttpCallbackNotifier, DEFAULT_CALLBACK_TIMEOUT};
pub use context::{run_phase, Phase, PhaseOutput, PipelineContext};
pub use driver::{run_pipeline, ExecutionMode, ExecutionPolicy, PipelineOutcome, PipelineRequest};
pub use handler::CalculationHandler;
pub use interfaces::{NullNotifier, RecordingNotifier, ReportNotifier};
