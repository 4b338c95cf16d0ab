use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::Entry;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read archive {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write archive {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize archive: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk layout of the archive file.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArchiveFile {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// JSON file holding every entry seen so far.
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads archived entries. A missing or malformed file reads as empty.
    pub fn load(&self) -> Result<Vec<Entry>, ArchiveError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No archive at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(ArchiveError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<ArchiveFile>(&bytes) {
            Ok(file) => Ok(file.entries),
            Err(e) => {
                warn!(
                    "Archive {} is malformed ({}), starting from an empty archive",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the archive with `entries`, stamped with the current time.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place, so readers never observe a half-written archive.
    pub fn save(&self, entries: &[Entry]) -> Result<(), ArchiveError> {
        #[derive(Serialize)]
        struct ArchiveRef<'a> {
            updated_at: String,
            entries: &'a [Entry],
        }

        let json = serde_json::to_vec_pretty(&ArchiveRef {
            updated_at: Utc::now().to_rfc3339(),
            entries,
        })?;

        let write_err = |source| ArchiveError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}
