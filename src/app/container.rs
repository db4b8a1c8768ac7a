use std::sync::Arc;

use crate::adapters::{CsvManifestAdapter, FFmpegAdapter, FsLocalAdapter, Settings};
use crate::app::batch_interactor::BatchInteractor;
use crate::domain::errors::ConfigError;
use crate::domain::rules::OutputPathResolver;
use crate::ports::{CutToolPort, FsPort, ManifestPort, ProgressPort};

pub trait AppContainer: Send + Sync {
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
}

pub struct DefaultAppContainer {
    batch_interactor: Arc<BatchInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters for the given settings
    pub fn new(settings: &Settings, progress_port: Arc<dyn ProgressPort>) -> Result<Self, ConfigError> {
        settings.validate()?;

        let manifest_port = Arc::new(CsvManifestAdapter::with_delimiter(settings.delimiter_byte()?));
        let tool_port = Arc::new(FFmpegAdapter::new(settings.tool.clone()));
        let fs_port = Arc::new(FsLocalAdapter::new());

        let batch_interactor = Arc::new(BatchInteractor::new(
            manifest_port as Arc<dyn ManifestPort>,
            tool_port as Arc<dyn CutToolPort>,
            fs_port as Arc<dyn FsPort>,
            progress_port,
            OutputPathResolver::new(settings.container_ext.clone()),
        ));

        Ok(Self { batch_interactor })
    }
}

impl AppContainer for DefaultAppContainer {
    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }
}
