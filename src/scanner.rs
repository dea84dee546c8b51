use anyhow::{Context, Result};
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Source scanner for traversing a project tree.
///
/// Annotation blocks may live in any kind of file, so the `SourceScanner` lists
/// every regular file below the root. Hidden files and directories (names
/// starting with `.`) are skipped.
///
/// # Example
///
/// ```no_run
/// use atoz::scanner::SourceScanner;
/// use std::path::PathBuf;
///
/// let scanner = SourceScanner::new(PathBuf::from("./my-project"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.files.len());
/// ```
pub struct SourceScanner {
    root_path: PathBuf,
}

/// Result of a directory scan.
pub struct ScanResult {
    /// Every discovered file, in sorted walk order
    pub files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

impl SourceScanner {
    /// Creates a new `SourceScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Walks the directory tree and collects all non-hidden files.
    ///
    /// Entries are visited in file-name order so repeated runs over the same
    /// tree produce the same file list. Inaccessible entries are logged and
    /// recorded as warnings; scanning continues past them.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself cannot be read.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::metadata(&self.root_path)
            .with_context(|| format!("Failed to access root: {}", self.root_path.display()))?;

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult { files, warnings })
    }
}
