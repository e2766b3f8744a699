//! Calculation lifecycle: create, multiply (serial or partitioned), report.
//!
//! Each operation is stateless: it reads what it needs from the store, runs
//! the engine, and writes its output back. The caller sequences phases and
//! threads the calculation id and worker count between them.

use std::sync::Arc;

use matmul_core::engine;
use matmul_core::error::{MatMulError, Result};
use matmul_core::generator::{generate_matrix, random_calculation};
use matmul_core::model::{CalculationId, ComputationResult, MatrixCalculation};
use matmul_core::report::{now_millis, MatrixInfo, Report};
use matmul_store::ComputationStore;

use crate::callback::HttpCallbackNotifier;
use crate::interfaces::ReportNotifier;

/// Drives the engine against a computation store.
#[derive(Clone)]
pub struct CalculationHandler {
    store: Arc<dyn ComputationStore>,
    notifier: Arc<dyn ReportNotifier>,
}

impl CalculationHandler {
    /// Create a handler that delivers callbacks over HTTP.
    #[must_use]
    pub fn new(store: Arc<dyn ComputationStore>) -> Self {
        Self::with_notifier(store, Arc::new(HttpCallbackNotifier::default()))
    }

    /// Create a handler with a custom report notifier.
    #[must_use]
    pub fn with_notifier(
        store: Arc<dyn ComputationStore>,
        notifier: Arc<dyn ReportNotifier>,
    ) -> Self {
        Self { store, notifier }
    }

    /// The store this handler reads from and writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ComputationStore> {
        &self.store
    }

    /// Generate and store two random `size×size` matrices.
    ///
    /// `seed == SEED_FROM_CLOCK` seeds from the current time; any other seed
    /// reproduces the same matrices for the same `size` and `max_value`.
    pub fn create_calculation(
        &self,
        size: usize,
        max_value: i32,
        seed: i64,
    ) -> Result<CalculationId> {
        let calculation = random_calculation(size, max_value, seed)?;
        self.store_new(&calculation)
    }

    /// Store a calculation built from caller-supplied cell generators.
    pub fn create_calculation_with<FA, FB>(
        &self,
        size: usize,
        gen_a: FA,
        gen_b: FB,
    ) -> Result<CalculationId>
    where
        FA: FnMut(usize, usize) -> i64,
        FB: FnMut(usize, usize) -> i64,
    {
        if size == 0 {
            return Err(MatMulError::InvalidInput("size must be positive".into()));
        }
        let calculation =
            MatrixCalculation::new(generate_matrix(size, gen_a), generate_matrix(size, gen_b))?;
        self.store_new(&calculation)
    }

    fn store_new(&self, calculation: &MatrixCalculation) -> Result<CalculationId> {
        let id = CalculationId::random();
        self.store.store_calculation(&id, calculation)?;
        tracing::info!(
            %id,
            size = calculation.size(),
            store = self.store.name(),
            "created calculation"
        );
        Ok(id)
    }

    /// Multiply on one thread and store the product as the result matrix.
    pub fn run_serial_multiply(&self, id: &CalculationId) -> Result<()> {
        let calculation = self.store.get_calculation(id)?;
        let result = engine::serial_multiply(&calculation)?;
        self.store.store_result_matrix(id, &result)?;
        tracing::info!(%id, "serial multiply complete");
        Ok(())
    }

    /// Partition the output cells and store every worker's task list.
    pub fn schedule_tasks(&self, id: &CalculationId, worker_count: usize) -> Result<()> {
        let calculation = self.store.get_calculation(id)?;
        let tasks = engine::build_tasks(worker_count, &calculation)?;
        for (worker_id, worker_tasks) in tasks.iter().enumerate() {
            tracing::debug!(%id, worker_id, tasks = worker_tasks.len(), "scheduling worker");
            self.store.store_tasks_for_worker(id, worker_id, worker_tasks)?;
        }
        tracing::info!(%id, worker_count, "scheduled tasks");
        Ok(())
    }

    /// Compute one worker's cells and store its results.
    pub fn run_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()> {
        let tasks = self.store.get_tasks_for_worker(id, worker_id)?;
        let calculation = self.store.get_calculation(id)?;
        let results = engine::perform_calculations(&tasks, &calculation)?;
        self.store.store_results_for_worker(id, worker_id, &results)?;
        tracing::debug!(%id, worker_id, results = results.len(), "worker complete");
        Ok(())
    }

    /// Load every worker's results, in worker order, and store the assembled matrix.
    ///
    /// Fails with `NotFound` on the first worker whose results are missing.
    pub fn assemble_result(&self, id: &CalculationId, worker_count: usize) -> Result<()> {
        if worker_count == 0 {
            return Err(MatMulError::InvalidInput(
                "worker count must be positive".into(),
            ));
        }
        let calculation = self.store.get_calculation(id)?;
        let results: Vec<Vec<ComputationResult>> = (0..worker_count)
            .map(|w| self.store.get_results_for_worker(id, w))
            .collect::<Result<_>>()?;

        let matrix = engine::build_result_matrix(&calculation, &results)?;
        self.store.store_result_matrix(id, &matrix)?;
        tracing::info!(%id, worker_count, "assembled result matrix");
        Ok(())
    }

    /// Summarize the calculation, notify the callback, and clean up.
    ///
    /// Callback and cleanup failures are logged and never fail the report.
    pub fn generate_report(
        &self,
        id: &CalculationId,
        start_timestamp: i64,
        worker_count: usize,
        callback_url: Option<&str>,
    ) -> Result<Report> {
        let calculation = self.store.get_calculation(id)?;
        let result = self.store.get_result_matrix(id)?;

        let report = Report {
            size: result.size(),
            input_matrix_a: MatrixInfo::of(calculation.a()),
            input_matrix_b: MatrixInfo::of(calculation.b()),
            result_matrix: MatrixInfo::of(&result),
            start_timestamp,
            end_timestamp: now_millis(),
        };
        tracing::info!(%id, elapsed_ms = report.elapsed_millis(), "report ready");

        if let Some(url) = callback_url {
            if let Err(e) = self.notifier.notify(url, &report) {
                tracing::warn!(%id, url, error = %e, "report callback failed");
            }
        }

        self.cleanup(id, worker_count);
        Ok(report)
    }

    /// Delete every artifact of `id`. Each failure is logged and skipped.
    pub fn cleanup(&self, id: &CalculationId, worker_count: usize) {
        let mut failures = 0usize;
        let mut attempt = |what: &str, outcome: Result<()>| {
            if let Err(e) = outcome {
                failures += 1;
                tracing::warn!(%id, what, error = %e, "cleanup step failed");
            }
        };

        attempt("calculation", self.store.delete_calculation(id));
        attempt("result matrix", self.store.delete_result_matrix(id));
        for w in 0..worker_count {
            attempt("worker results", self.store.delete_results_for_worker(id, w));
            attempt("worker tasks", self.store.delete_tasks_for_worker(id, w));
        }

        if failures == 0 {
            tracing::debug!(%id, worker_count, "cleanup complete");
        }
    }
}
