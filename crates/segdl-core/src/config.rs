use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User defaults loaded from `~/.config/segdl/config.toml`.
/// Command-line flags override every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegdlConfig {
    /// Number of byte-range segments per download.
    pub concurrency: usize,
    /// Chunk size in bytes for copying response bodies to disk.
    pub copy_buffer_size: usize,
    /// Seconds allowed for establishing a connection. Reads never time out.
    pub connect_timeout_secs: u64,
    /// Directory for downloads when none is given (None = current directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for SegdlConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            copy_buffer_size: 32 * 1024,
            connect_timeout_secs: 30,
            output_dir: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("segdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SegdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SegdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SegdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
