use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::cli::OutputFormat;
use crate::config::{Config, StorageBackend};
use crate::error::{Result, TrError};
use crate::library::UserLibrary;
use crate::paths::{LearningPathCatalog, LearningPathManager};
use crate::progress::ProgressTracker;
use crate::search::SearchEngine;
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};

pub struct AppContext {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub paths: Arc<LearningPathCatalog>,
    pub store: Arc<dyn KeyValueStore>,
    pub engine: SearchEngine,
    pub user_id: String,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        let output_format = cli.explicit_format().unwrap_or(config.robot.format);

        let store: Arc<dyn KeyValueStore> =
            if cli.ephemeral || config.storage.backend == StorageBackend::Memory {
                Arc::new(MemoryStore::new())
            } else {
                Arc::new(SqliteStore::open(root.join(&config.storage.db_file))?)
            };

        Self::build(&root, config, store, cli.user.clone(), output_format)
    }

    /// Assemble a context from parts and build the search index.
    pub fn build(
        root: &Path,
        config: Config,
        store: Arc<dyn KeyValueStore>,
        user_id: String,
        output_format: OutputFormat,
    ) -> Result<Self> {
        let catalog = Arc::new(Catalog::embedded()?);
        let paths = Arc::new(LearningPathCatalog::embedded()?);
        let engine = SearchEngine::new(Arc::clone(&catalog), config.to_search_options());

        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        runtime.block_on(engine.initialize());
        debug!(target: "app", root = %root.display(), user = %user_id, "context ready");

        Ok(Self {
            config,
            catalog,
            paths,
            store,
            engine,
            user_id,
            output_format,
        })
    }

    #[must_use]
    pub const fn robot_mode(&self) -> bool {
        self.output_format.is_robot()
    }

    #[must_use]
    pub fn library(&self) -> UserLibrary {
        UserLibrary::new(Arc::clone(&self.store), self.user_id.clone())
    }

    #[must_use]
    pub fn progress(&self) -> ProgressTracker {
        ProgressTracker::new(Arc::clone(&self.store), Arc::clone(&self.catalog))
    }

    #[must_use]
    pub fn path_manager(&self) -> LearningPathManager {
        LearningPathManager::new(Arc::clone(&self.store), Arc::clone(&self.paths))
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("TRACEREVERSE_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".tracereverse") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| TrError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("tracereverse"))
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
