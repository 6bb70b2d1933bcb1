// src/config/file.rs
//
// TOML persistence for AppOptions. A missing file is not an error.

use std::{fs, io, path::{Path, PathBuf}};

use super::{consts::DEFAULT_CONFIG_FILE, options::AppOptions};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("config parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

pub fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

pub fn load(path: &Path) -> Result<AppOptions, ConfigError> {
    if !path.exists() {
        logd!("Config: {} missing, using defaults", path.display());
        return Ok(AppOptions::default());
    }
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let opts = toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    logf!("Config: loaded {}", path.display());
    Ok(opts)
}

pub fn save(path: &Path, opts: &AppOptions) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Io { path: parent.to_path_buf(), source })?;
        }
    }
    let text = toml::to_string_pretty(opts)?;
    fs::write(path, text).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::RowOrder;

    #[test]
    fn partial_file_fills_defaults() {
        let opts: AppOptions = toml::from_str("[fetch]\nrow_order = \"schedule\"\n").unwrap();
        assert_eq!(opts.fetch.row_order, RowOrder::Schedule);
        assert_eq!(opts.fetch.request_timeout_secs, 30);
        assert_eq!(opts.capture.scope_suffixes.len(), 2);
        assert!(opts.export.copy_to_clipboard);
    }

    #[test]
    fn missing_file_is_default() {
        let p = std::env::temp_dir().join("attendance_scrape_no_such_config.toml");
        let _ = fs::remove_file(&p);
        assert_eq!(load(&p).unwrap(), AppOptions::default());
    }
}
