//! Home page summary

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Catalog counts shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Books whose title contains "the", ignoring case
    pub num_books_with_the: i64,
}

/// Home page payload: catalog counts plus this session's visit count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeSummary {
    #[serde(flatten)]
    pub counts: CatalogCounts,
    pub num_visits: i64,
}
