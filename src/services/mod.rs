//! Business logic services

pub mod authors;
pub mod books;
pub mod catalog;
pub mod clock;
pub mod copies;
pub mod dashboard;
pub mod import;

use std::sync::Arc;

use crate::{config::CatalogConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub catalog: catalog::CatalogService,
    pub copies: copies::CopiesService,
    pub dashboard: dashboard::DashboardService,
    pub import: import::ImportService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository and clock
    pub fn new(repository: Repository, catalog_config: &CatalogConfig, clock: Arc<dyn clock::Clock>) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            copies: copies::CopiesService::new(
                repository.clone(),
                clock,
                catalog_config.strict_loans,
            ),
            dashboard: dashboard::DashboardService::new(
                repository.clone(),
                catalog_config.recent_limit,
            ),
            import: import::ImportService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
