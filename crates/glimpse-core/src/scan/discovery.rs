//! File discovery: non-recursive listing of scannable images.

use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};

/// Lists eligible image files directly inside a directory.
pub struct FileDiscovery {
    config: ScanConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// Just the filename portion
    pub file_name: String,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// List supported image files directly inside `dir`.
    ///
    /// Subdirectories are not entered and directory entries themselves are
    /// skipped. Files come back in the order the filesystem lists them;
    /// no sort is applied.
    pub fn list(&self, dir: &Path) -> ScanResult<Vec<DiscoveredFile>> {
        if !dir.exists() {
            return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let entries = std::fs::read_dir(dir).map_err(|source| ScanError::List {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !self.is_supported(&path) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            files.push(DiscoveredFile {
                file_name: file_name.to_string(),
                path,
            });
        }

        tracing::debug!("Discovered {} image files in {:?}", files.len(), dir);
        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}
