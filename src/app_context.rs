use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use spdlog::info;

use crate::config::Config;
use crate::error::RepositoryError;
use crate::post_repository::PostRepository;

/// Everything a request handler needs: the configuration and the posts.
///
/// Built once at startup and handed to the dispatch layer. Handlers take a
/// snapshot of the repository with [`AppContext::repository`]; a reload builds a
/// whole new repository and swaps it in, snapshots already taken stay valid.
pub struct AppContext {
    config: Config,
    repository: RwLock<Arc<PostRepository>>,
}

impl AppContext {
    pub fn build(config: Config) -> Result<AppContext, RepositoryError> {
        let repository = Self::load_repository(&config)?;
        Ok(AppContext {
            config,
            repository: RwLock::new(Arc::new(repository)),
        })
    }

    fn load_repository(config: &Config) -> Result<PostRepository, RepositoryError> {
        let mut repository = PostRepository::load(&config.paths.posts_dir)?;

        if config.blog.published_only {
            repository.keep_only_published();
            info!("Published only mode, {} posts left", repository.total());
        }
        if config.blog.remove_upstream_links {
            repository.remove_upstream_links(&config.blog.baselink);
        }

        Ok(repository)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> Arc<PostRepository> {
        match self.repository.read() {
            Ok(repository) => repository.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Months with posts, for the navigation of every page.
    pub fn months(&self) -> Vec<NaiveDate> {
        self.repository().months().to_vec()
    }

    /// Reads the posts folder again. On error the current repository is kept.
    pub fn reload(&self) -> Result<(), RepositoryError> {
        let repository = Arc::new(Self::load_repository(&self.config)?);
        let mut current = match self.repository.write() {
            Ok(current) => current,
            Err(poisoned) => poisoned.into_inner(),
        };
        *current = repository;
        info!("Posts reloaded from {}", self.config.paths.posts_dir.display());
        Ok(())
    }
}
