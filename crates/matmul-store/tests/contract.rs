//! Contract tests run against every store backend.

use std::sync::Arc;

use tempfile::TempDir;

use matmul_core::error::MatMulError;
use matmul_core::generator::random_calculation;
use matmul_core::model::{CalculationId, ComputationResult, ComputationTask, Matrix};
use matmul_store::{ComputationStore, FsStore, InMemoryStore};

fn backends() -> Vec<(Arc<dyn ComputationStore>, Option<TempDir>)> {
    let dir = TempDir::new().unwrap();
    let fs_store = FsStore::open(dir.path()).unwrap();
    vec![
        (Arc::new(InMemoryStore::new()), None),
        (Arc::new(fs_store), Some(dir)),
    ]
}

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, MatMulError>) {
    match result {
        Err(MatMulError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn get_before_store_is_not_found() {
    for (store, _dir) in backends() {
        let id = CalculationId::random();
        assert_not_found(store.get_calculation(&id));
        assert_not_found(store.get_result_matrix(&id));
        assert_not_found(store.get_tasks_for_worker(&id, 0));
        assert_not_found(store.get_results_for_worker(&id, 0));
    }
}

#[test]
fn store_then_get_returns_value() {
    for (store, _dir) in backends() {
        let id = CalculationId::random();
        let calc = random_calculation(4, 100, 9).unwrap();
        let tasks = vec![ComputationTask::new(0, 1), ComputationTask::new(3, 2)];
        let results = vec![ComputationResult { x: 3, y: 2, value: -11 }];

        store.store_calculation(&id, &calc).unwrap();
        store.store_result_matrix(&id, calc.b()).unwrap();
        store.store_tasks_for_worker(&id, 2, &tasks).unwrap();
        store.store_results_for_worker(&id, 2, &results).unwrap();

        assert_eq!(store.get_calculation(&id).unwrap(), calc, "{}", store.name());
        assert_eq!(&store.get_result_matrix(&id).unwrap(), calc.b());
        assert_eq!(store.get_tasks_for_worker(&id, 2).unwrap(), tasks);
        assert_eq!(store.get_results_for_worker(&id, 2).unwrap(), results);
        assert_not_found(store.get_tasks_for_worker(&id, 1));
    }
}

#[test]
fn store_overwrites() {
    for (store, _dir) in backends() {
        let id = CalculationId::random();
        store.store_result_matrix(&id, &Matrix::zeros(2)).unwrap();
        store.store_result_matrix(&id, &Matrix::zeros(3)).unwrap();
        assert_eq!(store.get_result_matrix(&id).unwrap().size(), 3);

        store
            .store_tasks_for_worker(&id, 0, &[ComputationTask::new(0, 0)])
            .unwrap();
        store.store_tasks_for_worker(&id, 0, &[]).unwrap();
        assert!(store.get_tasks_for_worker(&id, 0).unwrap().is_empty());
    }
}

#[test]
fn delete_removes_and_tolerates_missing() {
    for (store, _dir) in backends() {
        let id = CalculationId::random();
        let calc = random_calculation(2, 10, 1).unwrap();
        store.store_calculation(&id, &calc).unwrap();
        store.delete_calculation(&id).unwrap();
        assert_not_found(store.get_calculation(&id));

        store.delete_calculation(&id).unwrap();
        store.delete_result_matrix(&id).unwrap();
        store.delete_tasks_for_worker(&id, 7).unwrap();
        store.delete_results_for_worker(&id, 7).unwrap();
    }
}

#[test]
fn calculations_are_isolated_by_id() {
    for (store, _dir) in backends() {
        let a = CalculationId::random();
        let b = CalculationId::random();
        store.store_result_matrix(&a, &Matrix::zeros(1)).unwrap();
        assert_not_found(store.get_result_matrix(&b));
        store.delete_result_matrix(&b).unwrap();
        assert!(store.get_result_matrix(&a).is_ok());
    }
}

#[test]
fn concurrent_writes_to_distinct_keys() {
    for (store, _dir) in backends() {
        let id = CalculationId::random();
        let calc = random_calculation(3, 10, 4).unwrap();
        store.store_calculation(&id, &calc).unwrap();

        std::thread::scope(|s| {
            for worker in 0..16 {
                let store = Arc::clone(&store);
                let id = id.clone();
                s.spawn(move || {
                    let read = store.get_calculation(&id).unwrap();
                    assert_eq!(read.size(), 3);
                    let results = vec![ComputationResult {
                        x: 0,
                        y: 0,
                        value: i64::try_from(worker).unwrap(),
                    }];
                    store.store_results_for_worker(&id, worker, &results).unwrap();
                });
            }
        });

        for worker in 0..16 {
            let results = store.get_results_for_worker(&id, worker).unwrap();
            assert_eq!(results[0].value, i64::try_from(worker).unwrap());
        }
    }
}

#[test]
fn fs_store_is_durable_across_handles() {
    let dir = TempDir::new().unwrap();
    let id = CalculationId::random();
    let calc = random_calculation(5, 50, 3).unwrap();
    FsStore::open(dir.path())
        .unwrap()
        .store_calculation(&id, &calc)
        .unwrap();

    let reopened = FsStore::open(dir.path()).unwrap();
    assert_eq!(reopened.get_calculation(&id).unwrap(), calc);
}
