//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Exit status for runtime failures, including missing overlay data
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for missing or invalid arguments
pub const EXIT_USAGE: i32 = 2;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::NoOverlayData => "*** No overlay data found".to_string(),
        other => format!("Error: {}", other),
    }
}
