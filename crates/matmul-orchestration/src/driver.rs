//! Single-process pipeline: create, multiply, report.
//!
//! Stands in for an external workflow engine. Worker fan-out runs on the
//! rayon pool; the parallel `try_for_each` is the fan-in barrier before
//! assembly.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use matmul_core::constants::{DEFAULT_SERIAL_THRESHOLD, DEFAULT_WORKER_COUNT};
use matmul_core::error::{MatMulError, Result};
use matmul_core::model::{CalculationId, Matrix, MatrixCalculation};
use matmul_core::report::{now_millis, Report};

use crate::handler::CalculationHandler;

/// Caller policy for choosing between the serial and partitioned paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPolicy {
    /// Sizes strictly below this run serially.
    pub serial_threshold: usize,
    /// Worker count for partitioned runs.
    pub workers: usize,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            serial_threshold: DEFAULT_SERIAL_THRESHOLD,
            workers: DEFAULT_WORKER_COUNT,
        }
    }
}

/// How one calculation is multiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Serial,
    Parallel { workers: usize },
}

impl ExecutionMode {
    /// Apply `policy` to a matrix of `size`.
    #[must_use]
    pub fn select(size: usize, policy: &ExecutionPolicy) -> Self {
        if size < policy.serial_threshold {
            Self::Serial
        } else {
            Self::Parallel {
                workers: policy.workers,
            }
        }
    }

    /// Worker slots used, 0 for serial.
    #[must_use]
    pub fn worker_count(self) -> usize {
        match self {
            Self::Serial => 0,
            Self::Parallel { workers } => workers,
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serial => f.write_str("serial"),
            Self::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
        }
    }
}

/// Everything needed to run one calculation end to end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub size: usize,
    pub max_value: i32,
    pub seed: i64,
    pub callback_url: Option<String>,
    pub policy: ExecutionPolicy,
    /// Keep copies of the inputs and product before cleanup removes them.
    pub keep_matrices: bool,
}

/// Result of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub id: CalculationId,
    pub mode: ExecutionMode,
    pub report: Report,
    /// Inputs and product, when requested.
    pub matrices: Option<(MatrixCalculation, Matrix)>,
}

/// Run one calculation through every phase.
pub fn run_pipeline(
    handler: &CalculationHandler,
    request: &PipelineRequest,
) -> Result<PipelineOutcome> {
    let mode = ExecutionMode::select(request.size, &request.policy);
    if let ExecutionMode::Parallel { workers: 0 } = mode {
        return Err(MatMulError::Config("worker count must be positive".into()));
    }

    let start = now_millis();
    let id = handler.create_calculation(request.size, request.max_value, request.seed)?;
    tracing::info!(%id, size = request.size, %mode, "pipeline started");

    match mode {
        ExecutionMode::Serial => handler.run_serial_multiply(&id)?,
        ExecutionMode::Parallel { workers } => {
            handler.schedule_tasks(&id, workers)?;
            (0..workers)
                .into_par_iter()
                .try_for_each(|w| handler.run_worker(&id, w))?;
            handler.assemble_result(&id, workers)?;
        }
    }

    let matrices = if request.keep_matrices {
        let store = handler.store();
        Some((store.get_calculation(&id)?, store.get_result_matrix(&id)?))
    } else {
        None
    };

    let report = handler.generate_report(
        &id,
        start,
        mode.worker_count(),
        request.callback_url.as_deref(),
    )?;
    tracing::info!(%id, elapsed_ms = report.elapsed_millis(), "pipeline finished");

    Ok(PipelineOutcome {
        id,
        mode,
        report,
        matrices,
    })
}
