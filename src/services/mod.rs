//! Business logic services

pub mod catalog;
pub mod loans;
pub mod sessions;
pub mod summary;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: sessions::SessionService,
    pub summary: summary::SummaryService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig, sessions: sessions::SessionService) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone(), config.catalog.clone()),
            loans: loans::LoansService::new(repository.clone(), &config.catalog),
            summary: summary::SummaryService::new(repository.clone(), sessions.clone()),
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            sessions,
            repository,
        }
    }

    /// Check the database is reachable
    pub async fn ping_database(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
