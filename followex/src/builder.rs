use std::path::PathBuf;

use log::info;

use crate::{
    api::ApiClientImpl,
    config::Config,
    core::{Core, Flattener, FollowerFetcher},
    error::Result,
    exporter::ExporterImpl,
    storage::FileRunStateStorage,
};

pub type DefaultCore = Core<ApiClientImpl, FileRunStateStorage, ExporterImpl>;

pub struct CoreBuilder {
    config: Config,
    output_dir: PathBuf,
}

impl CoreBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            output_dir: PathBuf::from("."),
        }
    }

    /// Directory receiving exports and the state file of interrupted runs.
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn build(self) -> Result<DefaultCore> {
        info!("CoreBuilder: Building Core service...");
        let api_client = ApiClientImpl::new(&self.config)?;
        info!("ApiClient created for {}", self.config.api_url);

        let flattener = Flattener::new(self.config.user_fields, self.config.tweet_fields);
        let fetcher = FollowerFetcher::new(api_client, flattener);

        let storage = FileRunStateStorage::new(&self.output_dir);
        let exporter = ExporterImpl::new(&self.output_dir);
        info!("Output directory: {}", self.output_dir.display());

        Ok(Core::new(fetcher, storage, exporter))
    }
}
