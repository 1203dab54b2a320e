//! Input discovery.
//!
//! Expands the command-line input list into an ordered list of files.
//! Explicit file paths are kept as given; directories are walked and
//! filtered by extension.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Configuration for input discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions picked up from directory inputs (e.g., ["txt", "dat"])
    pub extensions: Vec<String>,
    /// Walk directory inputs recursively
    pub recursive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["txt", "dat", "csv"]
                .into_iter()
                .map(String::from)
                .collect(),
            recursive: false,
        }
    }
}

impl From<&crate::config::InputConfig> for ScanConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            recursive: config.recursive,
        }
    }
}

/// Scanner that resolves input arguments to data files.
pub struct InputScanner {
    config: ScanConfig,
}

impl InputScanner {
    /// Create a new input scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Expand `inputs` into files, preserving argument order.
    ///
    /// Paths that do not exist are passed through unchanged so the parser
    /// reports them as unreadable.
    pub fn expand(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                let found = self.walk_dir(input);
                if found.is_empty() {
                    warn!("No data files found in directory {}", input.display());
                }
                files.extend(found);
            } else {
                files.push(input.clone());
            }
        }

        files
    }

    /// Check if a file found in a directory should be read.
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                return false;
            }
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.config
            .extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// Walk a directory input, sorted by file name.
    fn walk_dir(&self, dir: &Path) -> Vec<PathBuf> {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };

        WalkDir::new(dir)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
            })
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!("Cannot read entry under {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }
}
