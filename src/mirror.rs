//! Mirror of the displayed value in a file, for status bars and scripts.
//!
//! The file holds two lines: the text on screen and the underlying number of
//! seconds. It is rewritten every frame and removed when the program exits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct MirrorFile {
    path: PathBuf,
}

impl MirrorFile {
    /// Check that `path` can be used as a mirror file.
    ///
    /// The file must not exist yet (it is deleted on exit) and its directory
    /// must be writable.
    pub fn validate(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Err(ConfigError::OutfileExists(path.to_path_buf()));
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir_writable(&dir) {
            return Err(ConfigError::OutfileNotWritable(path.to_path_buf()));
        }
        Ok(MirrorFile {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the contents with the current text and value.
    pub fn write(&self, text: &str, value: f64) {
        let contents = format!("{}\n{}\n", text, format_value(value));
        if let Err(e) = fs::write(&self.path, contents) {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }

    /// Mark a finished countdown: `text` (or `DONE`) and a value of zero.
    pub fn write_done(&self, text: Option<&str>) {
        self.write(text.unwrap_or("DONE"), 0.0);
    }

    /// Delete the file; a file that is already gone is fine.
    pub fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}

/// Whole seconds print without a fraction, others with millisecond precision.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}

#[cfg(unix)]
fn dir_writable(dir: &Path) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(dir.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn dir_writable(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|m| m.is_dir() && !m.permissions().readonly())
        .unwrap_or(false)
}
