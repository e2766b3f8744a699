//! Error handling and exit codes.

use matmul_core::constants::exit_codes;
use matmul_core::error::MatMulError;

/// Map a calculation error to its process exit code.
#[must_use]
pub fn handle_error(err: &MatMulError) -> i32 {
    match err {
        MatMulError::NotFound(_) => exit_codes::ERROR_NOT_FOUND,
        MatMulError::Storage(_) => exit_codes::ERROR_STORAGE,
        MatMulError::InvalidInput(_) | MatMulError::Config(_) => exit_codes::ERROR_CONFIG,
        MatMulError::Callback(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for any top-level error.
///
/// Errors that do not originate in the engine (bad stdin JSON, I/O on
/// stdout) are generic failures.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MatMulError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
