//! Aggregate counts for the home page

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{CatalogCounts, LoanStatus},
};

#[derive(Clone)]
pub struct SummaryRepository {
    pool: Pool<Postgres>,
}

impl SummaryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All home page counts in one round trip
    pub async fn catalog_counts(&self) -> AppResult<CatalogCounts> {
        let counts = sqlx::query_as::<_, CatalogCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS num_books,
                (SELECT COUNT(*) FROM book_instances) AS num_instances,
                (SELECT COUNT(*) FROM book_instances WHERE status = $1) AS num_instances_available,
                (SELECT COUNT(*) FROM authors) AS num_authors,
                (SELECT COUNT(*) FROM genres) AS num_genres,
                (SELECT COUNT(*) FROM books WHERE title ILIKE $2) AS num_books_with_the
            "#,
        )
        .bind(LoanStatus::Available)
        .bind("%the%")
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
