//! Durable store: one JSON object per artifact under a root directory.
//!
//! Objects are written to a uniquely named temporary sibling and renamed into
//! place, so a concurrent reader sees either the previous object or the new
//! one, never a torn write.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use matmul_core::error::{MatMulError, Result};
use matmul_core::model::{
    CalculationId, ComputationResult, ComputationTask, Matrix, MatrixCalculation,
};

use crate::store::{ArtifactKey, ArtifactKind, ComputationStore};

const OBJECT_EXTENSION: &str = "json";

/// Filesystem-backed store.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| storage_error(&root, &e))?;
        tracing::debug!(root = %root.display(), "opened filesystem store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of objects currently in the store.
    pub fn object_count(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.root).map_err(|e| storage_error(&self.root, &e))?;
        let mut count = 0;
        for entry in entries {
            let entry = entry.map_err(|e| storage_error(&self.root, &e))?;
            if entry.path().extension().is_some_and(|ext| ext == OBJECT_EXTENSION) {
                count += 1;
            }
        }
        Ok(count)
    }

    fn path_for(&self, key: &ArtifactKey) -> Result<PathBuf> {
        validate_id(&key.id)?;
        Ok(self
            .root
            .join(format!("{}.{OBJECT_EXTENSION}", key.object_name())))
    }

    fn put<T: Serialize + ?Sized>(&self, key: &ArtifactKey, value: &T) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = self
            .root
            .join(format!(".{}.{}.tmp", key.object_name(), uuid::Uuid::new_v4()));

        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut writer, value)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&tmp, &path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            storage_error(&path, &e)
        })?;
        tracing::trace!(object = %key, "stored object");
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, key: &ArtifactKey) -> Result<T> {
        let path = self.path_for(key)?;
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MatMulError::NotFound(key.object_name()));
            }
            Err(e) => return Err(storage_error(&path, &e)),
        };
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| MatMulError::Storage(format!("{}: {e}", path.display())))
    }

    fn remove(&self, key: &ArtifactKey) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(object = %key, "removed object");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&path, &e)),
        }
    }
}

fn storage_error(path: &Path, err: &io::Error) -> MatMulError {
    MatMulError::Storage(format!("{}: {err}", path.display()))
}

/// Reject identifiers that could escape the store root.
fn validate_id(id: &CalculationId) -> Result<()> {
    let s = id.as_str();
    if s.is_empty()
        || s.contains(['/', '\\', '\0'])
        || s.contains("..")
        || s.starts_with('.')
    {
        return Err(MatMulError::InvalidInput(format!(
            "calculation id {s:?} is not a valid object name"
        )));
    }
    Ok(())
}

impl ComputationStore for FsStore {
    fn store_calculation(
        &self,
        id: &CalculationId,
        calculation: &MatrixCalculation,
    ) -> Result<()> {
        self.put(&ArtifactKey::new(id, ArtifactKind::Calculation), calculation)
    }

    fn get_calculation(&self, id: &CalculationId) -> Result<MatrixCalculation> {
        self.fetch(&ArtifactKey::new(id, ArtifactKind::Calculation))
    }

    fn delete_calculation(&self, id: &CalculationId) -> Result<()> {
        self.remove(&ArtifactKey::new(id, ArtifactKind::Calculation))
    }

    fn store_result_matrix(&self, id: &CalculationId, matrix: &Matrix) -> Result<()> {
        self.put(&ArtifactKey::new(id, ArtifactKind::ResultMatrix), matrix)
    }

    fn get_result_matrix(&self, id: &CalculationId) -> Result<Matrix> {
        self.fetch(&ArtifactKey::new(id, ArtifactKind::ResultMatrix))
    }

    fn delete_result_matrix(&self, id: &CalculationId) -> Result<()> {
        self.remove(&ArtifactKey::new(id, ArtifactKind::ResultMatrix))
    }

    fn store_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        tasks: &[ComputationTask],
    ) -> Result<()> {
        self.put(&ArtifactKey::new(id, ArtifactKind::Tasks(worker_id)), tasks)
    }

    fn get_tasks_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationTask>> {
        self.fetch(&ArtifactKey::new(id, ArtifactKind::Tasks(worker_id)))
    }

    fn delete_tasks_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()> {
        self.remove(&ArtifactKey::new(id, ArtifactKind::Tasks(worker_id)))
    }

    fn store_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
        results: &[ComputationResult],
    ) -> Result<()> {
        self.put(&ArtifactKey::new(id, ArtifactKind::Results(worker_id)), results)
    }

    fn get_results_for_worker(
        &self,
        id: &CalculationId,
        worker_id: usize,
    ) -> Result<Vec<ComputationResult>> {
        self.fetch(&ArtifactKey::new(id, ArtifactKind::Results(worker_id)))
    }

    fn delete_results_for_worker(&self, id: &CalculationId, worker_id: usize) -> Result<()> {
        self.remove(&ArtifactKey::new(id, ArtifactKind::Results(worker_id)))
    }

    fn name(&self) -> &str {
        "fs"
    }
}
