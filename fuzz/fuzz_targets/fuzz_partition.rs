#![no_main]

use libfuzzer_sys::fuzz_target;

use matmul_core::engine::{build_result_matrix, build_tasks, perform_calculations, serial_multiply};
use matmul_core::generator::random_calculation;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    // Small sizes keep each run cheap; values span the positive i32 range.
    let size = usize::from(data[0] % 24) + 1;
    let workers = usize::from(data[1] % 40) + 1;
    let max_value = i32::from_le_bytes([data[2], data[3], data[4], data[5] & 0x7f]).max(1);
    let seed = i64::from(i16::from_le_bytes([data[6], data[7]]));

    let calc = random_calculation(size, max_value, seed).unwrap();
    let serial = serial_multiply(&calc).unwrap();

    let tasks = build_tasks(workers, &calc).unwrap();
    assert_eq!(tasks.len(), workers);
    let total: usize = tasks.iter().map(Vec::len).sum();
    assert_eq!(total, size * size);

    let results: Vec<_> = tasks
        .iter()
        .map(|t| perform_calculations(t, &calc).unwrap())
        .collect();
    let assembled = build_result_matrix(&calc, &results).unwrap();

    assert_eq!(serial, assembled, "size={size} workers={workers} seed={seed}");
});
