//! Data Source Module
//! Named file reads, backed by a directory on disk.

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{name} not found")]
    NotFound { name: String },
    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// A read-only store of named text files.
pub trait DataSource: Send + Sync {
    fn read_to_string(&self, name: &str) -> Result<String, SourceError>;

    /// Human-readable description for status lines.
    fn describe(&self) -> String;
}

/// Reads files relative to a root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for DirSource {
    fn read_to_string(&self, name: &str) -> Result<String, SourceError> {
        let path = self.root.join(name);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            _ => SourceError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory files, used when the data is already at hand.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, contents: &str) -> Self {
        self.files.insert(name.to_string(), contents.to_string());
        self
    }
}

#[cfg(test)]
impl DataSource for MemorySource {
    fn read_to_string(&self, name: &str) -> Result<String, SourceError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_source_missing_file_is_not_found() {
        let source = DirSource::new(std::env::temp_dir().join("sea_the_truth_no_such_dir"));
        let err = source.read_to_string("absent.csv").unwrap_err();
        assert!(matches!(err, SourceError::NotFound { ref name } if name == "absent.csv"));
    }

    #[test]
    fn test_dir_source_reads_relative_to_root() {
        let dir = std::env::temp_dir().join(format!("sea_the_truth_src_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.csv"), "x\n1\n").unwrap();

        let source = DirSource::new(&dir);
        assert_eq!(source.read_to_string("a.csv").unwrap(), "x\n1\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new().with_file("a.csv", "x");
        assert_eq!(source.read_to_string("a.csv").unwrap(), "x");
        assert!(source.read_to_string("b.csv").is_err());
    }
}
