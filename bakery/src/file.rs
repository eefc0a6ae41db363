//! File resolution (spec §6.1): locating a file indication relative to the current source
//! file, or through the include-directory list.

use crate::ir::FileIndication;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileResolver {
    pub include_dirs: Vec<PathBuf>,
}

impl FileResolver {
    pub fn new(include_dirs: Vec<PathBuf>) -> FileResolver {
        FileResolver { include_dirs }
    }

    /// Resolve a file indication to a concrete path.
    ///
    /// * Relative indications (`"name"`) resolve against the directory of the file that
    ///   contains them.
    /// * Absolute indications (`<name>`) are searched through the include directories in
    ///   order.
    /// * A path that is itself OS-absolute is returned as-is, in either case.
    pub fn resolve(&self, indication: &FileIndication, current_dir: &Path) -> Result<PathBuf, String> {
        let raw = Path::new(&indication.path);
        if raw.is_absolute() {
            return if raw.exists() {
                Ok(raw.to_path_buf())
            } else {
                Err(format!("{} does not exist", raw.display()))
            };
        }
        if indication.absolute {
            for dir in &self.include_dirs {
                let candidate = dir.join(raw);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
            Err(format!(
                "\"{}\" not found in any include directory",
                indication.path
            ))
        } else {
            let candidate = current_dir.join(raw);
            if candidate.exists() {
                Ok(candidate)
            } else {
                Err(format!("{} does not exist", candidate.display()))
            }
        }
    }

    pub fn read(&self, indication: &FileIndication, current_dir: &Path) -> Result<(PathBuf, String), String> {
        let path = self.resolve(indication, current_dir)?;
        let text = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        Ok((path, text))
    }
}
