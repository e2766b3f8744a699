//! Constants for calculation defaults and process exit codes.

/// Seed sentinel meaning "seed the generator from the current epoch milliseconds".
pub const SEED_FROM_CLOCK: i64 = -1;

/// Default matrix dimension when a caller leaves it unset.
pub const DEFAULT_MATRIX_SIZE: usize = 200;

/// Default exclusive upper bound for generated cell values.
pub const DEFAULT_MAX_VALUE: i32 = 150;

/// Matrices smaller than this are multiplied serially by the reference policy.
pub const DEFAULT_SERIAL_THRESHOLD: usize = 10;

/// Worker count used by the reference policy for the parallel path.
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Exit codes for the `matmul` binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A stored artifact was missing.
    pub const ERROR_NOT_FOUND: i32 = 2;
    /// The storage backend failed.
    pub const ERROR_STORAGE: i32 = 3;
    /// Invalid configuration or input.
    pub const ERROR_CONFIG: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_policy_defaults() {
        assert_eq!(DEFAULT_SERIAL_THRESHOLD, 10);
        assert_eq!(DEFAULT_WORKER_COUNT, 5);
        assert_eq!(SEED_FROM_CLOCK, -1);
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            exit_codes::SUCCESS,
            exit_codes::ERROR_GENERIC,
            exit_codes::ERROR_NOT_FOUND,
            exit_codes::ERROR_STORAGE,
            exit_codes::ERROR_CONFIG,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
