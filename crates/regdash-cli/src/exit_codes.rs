//! Process exit codes.

use regdash_core::RegDashError;

pub const EXIT_SUCCESS: i32 = 0;
/// Bad input: invalid window selection or a rejected ingest batch.
pub const EXIT_VALIDATION: i32 = 1;
/// Store or I/O failure.
pub const EXIT_FATAL: i32 = 2;

pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<RegDashError>() {
        Some(e) if e.is_validation() => EXIT_VALIDATION,
        _ => EXIT_FATAL,
    }
}
