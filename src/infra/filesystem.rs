//! Filesystem operations
//!
//! Handles file and directory operations for the checkpoint store.

use std::path::Path;

use crate::error::CheckpointError;

/// Write content to a file, creating parent directories as needed
pub fn write_file(path: &Path, content: &str) -> Result<(), CheckpointError> {
    let write_err = |e: std::io::Error| CheckpointError::Write {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, CheckpointError> {
    std::fs::read_to_string(path).map_err(|e| CheckpointError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a file if it exists
pub fn remove_file(path: &Path) -> Result<(), CheckpointError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| CheckpointError::Remove {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}
