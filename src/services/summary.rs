//! Home page summary

use crate::{
    error::AppResult,
    models::HomeSummary,
    repository::Repository,
};

use super::sessions::SessionService;

#[derive(Clone)]
pub struct SummaryService {
    repository: Repository,
    sessions: SessionService,
}

impl SummaryService {
    pub fn new(repository: Repository, sessions: SessionService) -> Self {
        Self { repository, sessions }
    }

    /// Catalog counts plus this session's visit number
    pub async fn home(&self, session_id: &str) -> AppResult<HomeSummary> {
        let counts = self.repository.summary.catalog_counts().await?;
        let num_visits = self.sessions.record_visit(session_id).await?;
        Ok(HomeSummary { counts, num_visits })
    }
}
