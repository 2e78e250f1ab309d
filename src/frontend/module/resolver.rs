//! Native import path resolution
//!
//! Maps the path of a native import (`import "lib/math.ng"`) to a source
//! file.
//!
//! # Search order
//!
//! 1. An absolute path as given
//! 2. The directory of the importing file
//! 3. The current directory
//! 4. Configured search paths (`ng.toml`, then `NG_PATH`)

use std::path::{Path, PathBuf};

use super::ImportError;

/// Native import resolver for one importing file
#[derive(Debug)]
pub struct NativeResolver {
    /// File doing the import; empty for interactive input
    current_file: PathBuf,
    search_paths: Vec<PathBuf>,
}

impl NativeResolver {
    pub fn new(
        current_file: impl Into<PathBuf>,
        search_paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            current_file: current_file.into(),
            search_paths,
        }
    }

    /// Resolve an import path to a canonical file path
    pub fn resolve(
        &self,
        import_path: &str,
    ) -> Result<PathBuf, ImportError> {
        let found = self
            .candidates(import_path)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ImportError::NotFound {
                path: import_path.to_string(),
                searched: self.searched_paths(import_path),
            })?;
        std::fs::canonicalize(&found).map_err(|e| ImportError::Io(found, e))
    }

    fn candidates(
        &self,
        import_path: &str,
    ) -> Vec<PathBuf> {
        let path = Path::new(import_path);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        let mut dirs = Vec::new();
        if let Some(dir) = self.current_file.parent().filter(|d| !d.as_os_str().is_empty()) {
            dirs.push(dir.to_path_buf());
        }
        dirs.push(PathBuf::from("."));
        dirs.extend(self.search_paths.iter().cloned());
        dirs.into_iter().map(|dir| dir.join(path)).collect()
    }

    /// Searched locations, for error messages
    fn searched_paths(
        &self,
        import_path: &str,
    ) -> Vec<String> {
        self.candidates(import_path)
            .iter()
            .map(|p| p.display().to_string())
            .collect()
    }
}

/// Package name of a native file: its stem, `lib/math.ng` -> `math`
pub fn package_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name of a file in import cycle messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
