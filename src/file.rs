// src/file.rs

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use crate::config::consts::INPUT_DIR;
use crate::error::RunError;

/// Relative input names live under `input/`, unless they already point at an
/// existing file or already start with `input/`.
pub fn resolve_input_path(user_path: &Path) -> PathBuf {
    if user_path.is_absolute() || user_path.exists() || user_path.starts_with(INPUT_DIR) {
        return user_path.to_path_buf();
    }
    Path::new(INPUT_DIR).join(user_path)
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c=='/'||c=='\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<(), RunError> {
    let io_err = |source| RunError::Io { path: dir.to_path_buf(), source };
    if dir.exists() && !dir.is_dir() {
        return Err(io_err(io::Error::new(io::ErrorKind::AlreadyExists, "path exists but is not a directory")));
    }
    if !dir.exists() { fs::create_dir_all(dir).map_err(io_err)?; }
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<(), RunError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}
