// src/file.rs

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::config::consts::DEFAULT_FILE;

/// Write the rendered CSV. A directory-looking target gets the default file
/// name appended. Returns the final path written to.
pub fn write_export(target: &Path, csv: &str) -> io::Result<PathBuf> {
    let path = resolve_out_path(target)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(&path, csv)?;
    logf!("Export: wrote {}", path.display());
    Ok(path)
}

pub fn resolve_out_path(target: &Path) -> io::Result<PathBuf> {
    if looks_like_dir_hint(target) || target.is_dir() {
        ensure_directory(target)?;
        Ok(target.join(DEFAULT_FILE))
    } else {
        Ok(target.to_path_buf())
    }
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
