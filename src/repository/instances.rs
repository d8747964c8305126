//! Book instances repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstanceInput, BookInstance, BookInstanceDetail, LoanStatus, UserShort,
    },
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, due_back, borrower_id, status";

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Copy with its book title and borrower
    pub async fn get_detail(&self, id: Uuid, today: NaiveDate) -> AppResult<BookInstanceDetail> {
        let row = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.status, bi.due_back,
                   u.id AS borrower_id, u.username, u.first_name, u.last_name
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            LEFT JOIN users u ON u.id = bi.borrower_id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        let copy = BookInstance {
            id: row.get("id"),
            book_id: row.get("book_id"),
            imprint: row.get("imprint"),
            due_back: row.get("due_back"),
            borrower_id: row.get("borrower_id"),
            status: row.get("status"),
        };
        let borrower = row
            .get::<Option<i32>, _>("borrower_id")
            .map(|borrower_id| UserShort {
                id: borrower_id,
                username: row.get("username"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
            });

        Ok(BookInstanceDetail {
            is_overdue: copy.is_overdue(today),
            id: copy.id,
            book_id: copy.book_id,
            book_title: row.get("book_title"),
            imprint: copy.imprint,
            status: copy.status,
            due_back: copy.due_back,
            borrower,
        })
    }

    pub async fn create(&self, book_id: i32, input: &BookInstanceInput) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        );
        let instance = sqlx::query_as::<_, BookInstance>(&query)
            .bind(Uuid::new_v4())
            .bind(book_id)
            .bind(&input.imprint)
            .bind(input.due_back)
            .bind(input.borrower_id)
            .bind(input.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(instance)
    }

    /// Replace the editable fields of a copy. The status change must follow
    /// the copy lifecycle; the row is locked for the read-check-write.
    pub async fn update(&self, id: Uuid, input: &BookInstanceInput) -> AppResult<BookInstance> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "SELECT {} FROM book_instances WHERE id = $1 FOR UPDATE",
            INSTANCE_COLUMNS
        );
        let current = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        if !current.status.can_transition_to(input.status) {
            return Err(AppError::invalid(
                "status",
                format!(
                    "A copy cannot go from {} to {}",
                    current.status, input.status
                ),
            ));
        }

        let updated = BookInstance {
            imprint: input.imprint.clone(),
            due_back: input.due_back,
            borrower_id: input.borrower_id,
            status: input.status,
            ..current
        };
        updated.check_invariants()?;

        sqlx::query(
            r#"
            UPDATE book_instances
            SET imprint = $1, due_back = $2, borrower_id = $3, status = $4
            WHERE id = $5
            "#,
        )
        .bind(&updated.imprint)
        .bind(updated.due_back)
        .bind(updated.borrower_id)
        .bind(updated.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a copy. Refused while it is on loan or reserved.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let status: LoanStatus =
            sqlx::query_scalar("SELECT status FROM book_instances WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        if status.holds_borrower() {
            return Err(AppError::Conflict(format!(
                "Book instance {} is {}",
                id, status
            )));
        }

        sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
