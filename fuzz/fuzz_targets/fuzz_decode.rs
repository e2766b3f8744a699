#![no_main]

use libfuzzer_sys::fuzz_target;

use matmul_core::engine::serial_multiply;
use matmul_core::model::{Matrix, MatrixCalculation};

// Stored objects come from disk; decoding must reject, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(calc) = serde_json::from_slice::<MatrixCalculation>(data) {
        if calc.size() <= 32 {
            let product = serial_multiply(&calc).unwrap();
            assert_eq!(product.size(), calc.size());
        }
    }
    if let Ok(matrix) = serde_json::from_slice::<Matrix>(data) {
        assert_eq!(matrix.rows().len(), matrix.size());
    }
});
