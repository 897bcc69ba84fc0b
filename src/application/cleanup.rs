use std::{fs, io::ErrorKind, path::PathBuf};

use tracing::{debug, warn};

/// Files removed when the guard goes out of scope.
///
/// Tracking happens before a file is created so that failures halfway through
/// writing or rendering still clean up. Paths that never materialized are
/// skipped silently.
#[derive(Debug, Default)]
pub struct TransientFiles {
    paths: Vec<PathBuf>,
}

impl TransientFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(
                    target = "application::cleanup",
                    path = %path.display(),
                    "Removed transient file"
                ),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => warn!(
                    target = "application::cleanup",
                    path = %path.display(),
                    error = %err,
                    "Failed to remove transient file"
                ),
            }
        }
    }
}
