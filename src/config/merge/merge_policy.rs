//! Merge rules: defaults, override order, conflict handling.

use crate::compress::DEFAULT_LEVEL;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// List-valued settings take their defaults from serde so that a file
/// setting a list replaces it rather than merging element-wise.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("scan.vcs_dir", ".git")?
        .set_default("scan.tools_dir", "tools")?
        .set_default("install.compress", false)?
        .set_default("install.compression_level", i64::from(DEFAULT_LEVEL))?
        .set_default("install.data_file", "dev/initfs.lua")?
        .set_default("install.data_variable", "WoWXIV_initfs")?
        .set_default("pull.overlay_variable", "WoWXIV_initfs_overlay")?
        .set_default("pull.newline_policy", "exact")
}
