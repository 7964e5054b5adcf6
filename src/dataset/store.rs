//! Single-file dataset store
//!
//! Holds at most one CSV file in the media directory. Uploading replaces the
//! resident file wholesale; the replacement is written under a temporary name
//! and renamed into place before the previous file is removed, so a failed
//! upload never destroys the existing dataset.

use crate::error::{RecappError, Result};
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const UPLOAD_SUFFIX: &str = ".upload";

/// The resident dataset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDataset {
    pub file_name: String,
    pub path: PathBuf,
}

/// Contents of the resident dataset, read under the store guard
#[derive(Debug, Clone)]
pub struct DatasetFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Exclusive-access store for the one uploaded dataset
#[derive(Debug)]
pub struct DatasetStore {
    dir: PathBuf,
    current: RwLock<Option<StoredDataset>>,
}

impl DatasetStore {
    /// Open the store rooted at `dir`, adopting a file that is already there.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let files: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();

        let mut names = Vec::new();
        for name in files {
            if name.starts_with('.') && name.ends_with(UPLOAD_SUFFIX) {
                warn!(file = %name, "Removing interrupted upload");
                fs::remove_file(dir.join(&name))?;
            } else if sanitize_file_name(&name).is_ok() {
                names.push(name);
            }
        }
        names.sort();

        let current = names.pop().map(|file_name| StoredDataset {
            path: dir.join(&file_name),
            file_name,
        });
        for stale in &names {
            warn!(file = %stale, "Removing extra file from media directory");
            fs::remove_file(dir.join(stale))?;
        }
        if let Some(ref dataset) = current {
            info!(file = %dataset.file_name, "Adopted existing dataset");
        }

        Ok(Self {
            dir,
            current: RwLock::new(current),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Replace the resident dataset with `bytes`, stored as `file_name`.
    pub fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredDataset> {
        let file_name = sanitize_file_name(file_name)?;
        let path = self.dir.join(&file_name);
        let staging = self.dir.join(format!(".{}{}", file_name, UPLOAD_SUFFIX));

        let mut current = self.current.write();
        fs::write(&staging, bytes)?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        let stored = StoredDataset { file_name, path };
        if let Some(previous) = current.replace(stored.clone()) {
            if previous.path != stored.path {
                if let Err(e) = fs::remove_file(&previous.path) {
                    warn!(file = %previous.file_name, error = %e, "Failed to remove replaced dataset");
                }
            }
        }

        info!(file = %stored.file_name, bytes = bytes.len(), "Dataset stored");
        Ok(stored)
    }

    pub fn current(&self) -> Option<StoredDataset> {
        self.current.read().clone()
    }

    /// Read the resident file's bytes, `None` when no dataset is stored.
    pub fn read_current(&self) -> Result<Option<DatasetFile>> {
        let current = self.current.read();
        match current.as_ref() {
            Some(dataset) => {
                let bytes = fs::read(&dataset.path)?;
                Ok(Some(DatasetFile {
                    file_name: dataset.file_name.clone(),
                    bytes,
                }))
            }
            None => Ok(None),
        }
    }

    /// Remove the resident dataset. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool> {
        let mut current = self.current.write();
        match current.take() {
            Some(dataset) => {
                match fs::remove_file(&dataset.path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => {
                        *current = Some(dataset);
                        return Err(e.into());
                    }
                }
                info!(file = %dataset.file_name, "Dataset removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Keep only the final path component and require a visible `.csv` name.
fn sanitize_file_name(raw: &str) -> Result<String> {
    let name = Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .unwrap_or_default();

    if name.is_empty() || name.starts_with('.') {
        return Err(RecappError::InvalidInput(format!("invalid file name: '{}'", raw)));
    }
    if !name.to_lowercase().ends_with(".csv") {
        return Err(RecappError::InvalidInput(format!(
            "unsupported file '{}', expected a .csv file",
            name
        )));
    }
    Ok(name.to_string())
}
