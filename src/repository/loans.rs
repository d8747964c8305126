//! Loans repository: copies on loan and renewal

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{validate_renewal_date, LoanRow, RenewalConfirmation},
        BookInstance, LoanStatus, PageRequest,
    },
};

const LOAN_COLUMNS: &str = r#"
    bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
    u.id AS borrower_id, u.username AS borrower_username,
    u.first_name AS borrower_first_name, u.last_name AS borrower_last_name
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn list_for_borrower(
        &self,
        borrower_id: i32,
        page: PageRequest,
    ) -> AppResult<(Vec<LoanRow>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE borrower_id = $1 AND status = $2",
        )
        .bind(borrower_id)
        .bind(LoanStatus::OnLoan)
        .fetch_one(&self.pool)
        .await?;
        page.ensure_in_range(total)?;

        let query = format!(
            r#"
            SELECT {}
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            JOIN users u ON u.id = bi.borrower_id
            WHERE bi.borrower_id = $1 AND bi.status = $2
            ORDER BY bi.due_back, bi.id
            LIMIT $3 OFFSET $4
            "#,
            LOAN_COLUMNS
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(borrower_id)
            .bind(LoanStatus::OnLoan)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Every copy on loan, soonest due first
    pub async fn list_on_loan(&self, page: PageRequest) -> AppResult<(Vec<LoanRow>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(LoanStatus::OnLoan)
            .fetch_one(&self.pool)
            .await?;
        page.ensure_in_range(total)?;

        let query = format!(
            r#"
            SELECT {}
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            JOIN users u ON u.id = bi.borrower_id
            WHERE bi.status = $1
            ORDER BY bi.due_back, bi.id
            LIMIT $2 OFFSET $3
            "#,
            LOAN_COLUMNS
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(LoanStatus::OnLoan)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Copy and book title shown on the renewal form
    pub async fn get_renewal_target(&self, id: Uuid) -> AppResult<(BookInstance, String)> {
        let instance = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, due_back, borrower_id, status FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        let title: String = sqlx::query_scalar("SELECT title FROM books WHERE id = $1")
            .bind(instance.book_id)
            .fetch_one(&self.pool)
            .await?;

        Ok((instance, title))
    }

    /// Move the due date of a copy on loan.
    ///
    /// Runs in one transaction holding the row lock on the copy, so concurrent
    /// renewals of the same copy are serialized.
    pub async fn renew(
        &self,
        id: Uuid,
        requested: NaiveDate,
        today: NaiveDate,
    ) -> AppResult<RenewalConfirmation> {
        let mut tx = self.pool.begin().await?;

        let instance = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, due_back, borrower_id, status
            FROM book_instances
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        validate_renewal_date(requested, today)?;

        if instance.status != LoanStatus::OnLoan {
            return Err(AppError::Conflict(format!(
                "Book instance {} is not on loan ({})",
                id, instance.status
            )));
        }

        let previous_due_back = instance.due_back;
        let renewed = BookInstance {
            due_back: Some(requested),
            ..instance
        };
        renewed.check_invariants()?;

        sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(requested)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let book_title: String = sqlx::query_scalar("SELECT title FROM books WHERE id = $1")
            .bind(renewed.book_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(RenewalConfirmation {
            id,
            book_id: renewed.book_id,
            message: format!("'{}' renewed until {}", book_title, requested),
            book_title,
            previous_due_back,
            due_back: requested,
        })
    }
}
