//! Install command presentation.

use crate::error::ApiError;
use crate::install::InstallReport;

pub fn format_install_text(report: &InstallReport) -> String {
    let mut output = format!("Installed to {}\n", report.target.display());
    output.push_str(&format!(
        "  data file: {} ({} bytes{})\n",
        report.data_file.display(),
        report.literal_bytes,
        if report.compressed { ", compressed" } else { "" }
    ));
    output.push_str(&format!("  embedded:  {} files\n", report.embedded));
    output.push_str(&format!("  copied:    {} files", report.copied));
    output
}

pub fn format_install_json(report: &InstallReport) -> Result<String, ApiError> {
    serde_json::to_string_pretty(report).map_err(|e| ApiError::Render(e.to_string()))
}
