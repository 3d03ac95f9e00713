//! Pull command presentation.

use crate::error::ApiError;
use crate::reconcile::ReconcileReport;

/// Message printed when a pull writes nothing
pub const NO_CHANGES: &str = "(no changes found)";

/// One changed path per line, or the no-changes message
pub fn format_pull_text(report: &ReconcileReport) -> String {
    if report.is_empty() {
        NO_CHANGES.to_string()
    } else {
        report.changed.join("\n")
    }
}

pub fn format_pull_json(report: &ReconcileReport) -> Result<String, ApiError> {
    serde_json::to_string_pretty(report).map_err(|e| ApiError::Render(e.to_string()))
}
