//! Config command presentation.

use crate::config::OverlayConfig;
use crate::error::ApiError;

/// Render the effective configuration as TOML
pub fn format_config_toml(config: &OverlayConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config).map_err(|e| ApiError::Render(e.to_string()))
}
