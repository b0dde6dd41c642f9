use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

use crate::config::SessionPaths;
use crate::domain::session::SessionDescriptor;
use crate::error::SessionError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub fn session_dir_name(now: NaiveDateTime, value: &str) -> String {
    format!("{}-{}", now.format(TIMESTAMP_FORMAT), value)
}

/// Create `<app-data>/output/<timestamp>-<value>`.
///
/// Missing parents are created; the leaf itself must not exist yet.
/// `value` is used verbatim, a slash in it nests the directory.
pub fn provision(
    paths: &SessionPaths,
    now: NaiveDateTime,
    value: &str,
) -> Result<SessionDescriptor, SessionError> {
    let dir = paths.output_root().join(session_dir_name(now, value));
    let dir_err = |path: &Path, source| SessionError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    };
    let dir = std::path::absolute(&dir).map_err(|e| dir_err(dir.as_path(), e))?;

    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent).map_err(|e| dir_err(parent, e))?;
    }
    fs::create_dir(&dir).map_err(|e| dir_err(dir.as_path(), e))?;
    log::info!("session directory {}", dir.display());

    Ok(SessionDescriptor {
        email: value.to_string(),
        log_directory: dir,
    })
}

/// Replace `path` with the JSON form of `descriptor`.
pub fn write_descriptor(path: &Path, descriptor: &SessionDescriptor) -> Result<(), SessionError> {
    let err = |source| SessionError::Descriptor {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_vec(descriptor).map_err(|e| err(std::io::Error::other(e)))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(err)?;
    }
    fs::write(path, json).map_err(err)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
