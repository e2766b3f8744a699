//! In-process, non-durable store.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

use matmul_core::error::{MatMulError, Result};
use matmul_core::model::{
    CalculationId, ComputationResult, ComputationTask, Matrix, MatrixCalculation,
};

use crate::store::{ArtifactKey, ArtifactKind, ComputationStore};

/// Store backed by lock-protected hash maps, one per artifact kind.
#[derive(Default)]
pub struct InMemoryStore {
    calculations: RwLock<HashMap<ArtifactKey, MatrixCalculation>>,
    result_matrices: RwLock<HashMap<ArtifactKey, Matrix>>,
    tasks: RwLock<HashMap<ArtifactKey, Vec<ComputationTask>>>,
    worker_results: RwLock<HashMap<ArtifactKey, Vec<ComputationResult>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts currently held, across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calculations.read().len()
            + self.result_matrices.read().len()
            + self.tasks.read().len()
            + self.worker_results.read().len()
    }

    /// Whether the store holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fetch<K, V>(map: &RwLock<HashMap<K, V>>, key: &K) -> Result<V>
where
    K: Eq + Hash + std::fmt::Display,
    V: Clone,
{
    map.read()
        .get(key)
        .cloned()
        .ok_or_else(|| MatMulError::NotFound(key.to_string()))
}

impl ComputationStore for InMemoryStore {
    fn store_calculation(
        &self,
        id: &CalculationId,
        calculation: &MatrixCalculation,
    ) -> Result<()> {
        let key = ArtifactKey::new(id, ArtifactKind::Calculation);
        self.calculations.write().insert(key, calculation.clone());
        Ok(())
    }

    fn get_calculation(&self, id: &CalculationId) -> Result<MatrixCalculation> {
        fetch(
            &self.calculations,
            &ArtifactKey::new(id, ArtifactKind::Calculation),
        )
    }

    fn delete_calculation(&self, id: &CalculationId) -> Result<()> {
        self.calculations
            .write()
            .remove(&ArtifactKey::new(id, ArtifactKind::Calculation));
        Ok(())
    }

    fn store_result_matrix(&self, id: &CalculationId, matrix: &Matrix) -> Result<()> {
        let key = ArtifactKey::new(id, ArtifactKind::ResultMatrix);
        self.result_matrices.write().insert(key, matrix.clone());
        Ok(())
    }

    fn get_result_matrix(&self, id: &CalculationId) -> Result<Matrix> {
        fetch(
            &self.result_matrices,
            &ArtifactKey::new(id, ArtifactKind::ResultMatrix),
        )
    }

    fn delete_result_matrix(&self, id: &CalculationId) -> Result<()> {
        self.result_matrices
            .write()
            .remove(&ArtifactKey::new(id, ArtifactKind::ResultMatrix));
        Ok(())
    }

    fn store_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        tasks: &[ComputationTask],
    ) -> Result<()> {
        let key = ArtifactKey::new(id, ArtifactKind::Tasks(worker_id));
        self.tasks.write().insert(key, tasks.to_vec());
        Ok(())
    }

    fn get_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationTask>> {
        fetch(
            &self.tasks,
            &ArtifactKey::new(id, ArtifactKind::Tasks(worker_id)),
        )
    }

    fn delete_tasks_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()> {
        self.tasks
            .write()
            .remove(&ArtifactKey::new(id, ArtifactKind::Tasks(worker_id)));
        Ok(())
    }

    fn store_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        results: &[ComputationResult],
    ) -> Result<()> {
        let key = ArtifactKey::new(id, ArtifactKind::Results(worker_id));
        self.worker_results.write().insert(key, results.to_vec());
        Ok(())
    }

    fn get_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationResult>> {
        fetch(
            &self.worker_results,
            &ArtifactKey::new(id, ArtifactKind::Results(worker_id)),
        )
    }

    fn delete_results_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()> {
        self.worker_results
            .write()
            .remove(&ArtifactKey::new(id, ArtifactKind::Results(worker_id)));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
