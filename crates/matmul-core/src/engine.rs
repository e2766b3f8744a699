//! Computation engine: serial multiply, task partitioning, per-worker
//! execution, and result assembly.
//!
//! Every function here is pure. Nothing is retained between calls, so any
//! number of workers may run [`perform_calculations`] against the same
//! calculation at once.

use crate::error::{MatMulError, Result};
use crate::model::{ComputationResult, ComputationTask, Matrix, MatrixCalculation};

/// Multiply `A × B` on the calling thread with the naive triple loop.
pub fn serial_multiply(calculation: &MatrixCalculation) -> Result<Matrix> {
    calculation.validate()?;
    let n = calculation.size();
    let mut matrix = Matrix::zeros(n);

    for x in 0..n {
        for y in 0..n {
            matrix.set(x, y, calculation.cell(x, y));
        }
    }

    Ok(matrix)
}

/// Partition all `size²` output cells round-robin across `worker_count` workers.
///
/// Cell number `k` in row-major order goes to worker `k % worker_count`. The
/// returned vector always has exactly `worker_count` entries; workers past
/// `size²` receive an empty list. Assignment depends only on
/// `(size, worker_count)`.
pub fn build_tasks(
    worker_count: usize,
    calculation: &MatrixCalculation,
) -> Result<Vec<Vec<ComputationTask>>> {
    calculation.validate()?;
    if worker_count == 0 {
        return Err(MatMulError::InvalidInput(
            "worker count must be positive".into(),
        ));
    }

    let n = calculation.size();
    let per_worker = (n * n).div_ceil(worker_count);
    let mut tasks: Vec<Vec<ComputationTask>> = (0..worker_count)
        .map(|_| Vec::with_capacity(per_worker))
        .collect();

    let mut cnt = 0usize;
    for x in 0..n {
        for y in 0..n {
            tasks[cnt % worker_count].push(ComputationTask::new(x, y));
            cnt += 1;
        }
    }

    Ok(tasks)
}

/// Compute the cells assigned to one worker, preserving task order.
pub fn perform_calculations(
    tasks: &[ComputationTask],
    calculation: &MatrixCalculation,
) -> Result<Vec<ComputationResult>> {
    calculation.validate()?;
    let n = calculation.size();
    if let Some(t) = tasks.iter().find(|t| t.x >= n || t.y >= n) {
        return Err(MatMulError::InvalidInput(format!(
            "task ({}, {}) outside {n}x{n} matrix",
            t.x, t.y
        )));
    }

    Ok(tasks
        .iter()
        .map(|t| ComputationResult {
            x: t.x,
            y: t.y,
            value: calculation.cell(t.x, t.y),
        })
        .collect())
}

/// Assemble the result matrix from every worker's partial results.
///
/// Lists and entries may arrive in any order. Completeness is not checked:
/// cells nobody reported stay zero, and a cell reported twice keeps the last
/// value written. Debug builds assert that no cell is written twice.
pub fn build_result_matrix<R>(calculation: &MatrixCalculation, results: &[R]) -> Result<Matrix>
where
    R: AsRef<[ComputationResult]>,
{
    calculation.validate()?;
    let n = calculation.size();
    let mut matrix = Matrix::zeros(n);

    #[cfg(debug_assertions)]
    let mut seen = vec![false; n * n];

    for worker_results in results {
        for r in worker_results.as_ref() {
            if r.x >= n || r.y >= n {
                return Err(MatMulError::InvalidInput(format!(
                    "result ({}, {}) outside {n}x{n} matrix",
                    r.x, r.y
                )));
            }
            #[cfg(debug_assertions)]
            {
                let idx = r.x * n + r.y;
                debug_assert!(!seen[idx], "cell ({}, {}) reported twice", r.x, r.y);
                seen[idx] = true;
            }
            matrix.set(r.x, r.y, r.value);
        }
    }

    Ok(matrix)
}
