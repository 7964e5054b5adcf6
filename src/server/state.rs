//! Application state management

use crate::dataset::{DatasetFile, DatasetStore};
use crate::error::{RecappError, Result};
use crate::pipeline::{Pipeline, PipelineConfig};

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub store: DatasetStore,
    pub pipeline: Pipeline,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Open the media directory and build the pipeline.
    pub fn new(config: ServerConfig, pipeline_config: PipelineConfig) -> Result<Self> {
        pipeline_config.validate()?;
        let store = DatasetStore::open(&config.media_dir)?;
        Ok(Self {
            config,
            store,
            pipeline: Pipeline::new(pipeline_config),
            started_at: chrono::Utc::now(),
        })
    }

    /// Bytes of the resident dataset, `NotFound` when none is stored.
    pub fn require_dataset(&self) -> Result<DatasetFile> {
        self.store
            .read_current()?
            .ok_or_else(|| RecappError::NotFound("no dataset has been uploaded".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            media_dir: dir.to_path_buf(),
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_require_dataset_absent() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path()), PipelineConfig::default()).unwrap();
        assert!(matches!(state.require_dataset(), Err(RecappError::NotFound(_))));
    }

    #[test]
    fn test_require_dataset_present() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path()), PipelineConfig::default()).unwrap();
        state.store.store("data.csv", b"a,b\n1,2\n").unwrap();
        assert_eq!(state.require_dataset().unwrap().file_name, "data.csv");
    }
}
