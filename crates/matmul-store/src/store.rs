//! The computation store contract and its key space.

use std::fmt;

use matmul_core::error::Result;
use matmul_core::model::{
    CalculationId, ComputationResult, ComputationTask, Matrix, MatrixCalculation,
};

/// Durable key-value persistence for one or many calculations.
///
/// Contract:
/// - every `get_*` on a key never stored fails with `MatMulError::NotFound`;
/// - every `store_*` overwrites (last write wins);
/// - every `delete_*` on a missing key succeeds;
/// - no atomicity across operations. Callers order phases themselves.
///
/// Implementations must allow concurrent reads of one key and concurrent
/// writes to distinct keys; all methods take `&self`.
pub trait ComputationStore: Send + Sync {
    fn store_calculation(&self, id: &CalculationId, calculation: &MatrixCalculation)
        -> Result<()>;
    fn get_calculation(&self, id: &CalculationId) -> Result<MatrixCalculation>;
    fn delete_calculation(&self, id: &CalculationId) -> Result<()>;

    fn store_result_matrix(&self, id: &CalculationId, matrix: &Matrix) -> Result<()>;
    fn get_result_matrix(&self, id: &CalculationId) -> Result<Matrix>;
    fn delete_result_matrix(&self, id: &CalculationId) -> Result<()>;

    fn store_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        tasks: &[ComputationTask],
    ) -> Result<()>;
    fn get_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationTask>>;
    fn delete_tasks_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()>;

    fn store_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        results: &[ComputationResult],
    ) -> Result<()>;
    fn get_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationResult>>;
    fn delete_results_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Kind of artifact stored for a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Calculation,
    ResultMatrix,
    Tasks(usize),
    Results(usize),
}

/// Address of one stored artifact: calculation id × kind × optional worker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub id: CalculationId,
    pub kind: ArtifactKind,
}

impl ArtifactKey {
    #[must_use]
    pub fn new(id: &CalculationId, kind: ArtifactKind) -> Self {
        Self {
            id: id.clone(),
            kind,
        }
    }

    /// Object name shared with the object-storage bindings.
    #[must_use]
    pub fn object_name(&self) -> String {
        match self.kind {
            ArtifactKind::Calculation => self.id.to_string(),
            ArtifactKind::ResultMatrix => format!("{}_result", self.id),
            ArtifactKind::Tasks(w) => format!("{}_tasks_worker_{w}", self.id),
            ArtifactKind::Results(w) => format!("{}_results_worker_{w}", self.id),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.object_name())
    }
}
