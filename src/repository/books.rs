//! Books repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{AuthorShort, BookInput},
        Book, BookDetail, BookInstance, BookSummary, Genre, Language, LoanStatus, PageRequest,
    },
};

const SUMMARY_COLUMNS: &str = r#"
    b.id, b.title, b.author_id,
    (a.last_name || ', ' || a.first_name) AS author_name
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books ordered by title
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<BookSummary>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        page.ensure_in_range(total)?;

        let query = format!(
            r#"
            SELECT {}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.title, b.id
            LIMIT $1 OFFSET $2
            "#,
            SUMMARY_COLUMNS
        );
        let books = sqlx::query_as::<_, BookSummary>(&query)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn, language_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Book with author, language, genres and copies
    pub async fn get_detail(&self, id: i32, today: NaiveDate) -> AppResult<BookDetail> {
        let book = self.get_by_id(id).await?;

        let author = sqlx::query_as::<_, AuthorShort>(
            "SELECT id, first_name, last_name FROM authors WHERE id = $1",
        )
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        let language = match book.language_id {
            Some(language_id) => {
                sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
                    .bind(language_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let instances = sqlx::query_as::<_, BookInstance>(
            r#"
            SELECT id, book_id, imprint, due_back, borrower_id, status
            FROM book_instances
            WHERE book_id = $1
            ORDER BY status, due_back NULLS LAST, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(BookDetail {
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            author,
            language,
            genres,
            instances: instances.into_iter().map(|copy| copy.summary(today)).collect(),
        })
    }

    /// Books written by an author, by title
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let query = format!(
            r#"
            SELECT {}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.author_id = $1
            ORDER BY b.title, b.id
            "#,
            SUMMARY_COLUMNS
        );
        let books = sqlx::query_as::<_, BookSummary>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Books filed under a genre, by title
    pub async fn list_by_genre(&self, genre_id: i32) -> AppResult<Vec<BookSummary>> {
        let query = format!(
            r#"
            SELECT {}
            FROM books b
            JOIN authors a ON a.id = b.author_id
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title, b.id
            "#,
            SUMMARY_COLUMNS
        );
        let books = sqlx::query_as::<_, BookSummary>(&query)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    // =========================================================================
    // CREATE / UPDATE
    // =========================================================================

    pub async fn create(&self, input: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author_id, summary, isbn, language_id
            "#,
        )
        .bind(&input.title)
        .bind(input.author_id)
        .bind(&input.summary)
        .bind(&input.isbn)
        .bind(input.language_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::replace_genres(&mut tx, book.id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace every editable field of a book, genre links included
    pub async fn update(&self, id: i32, input: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            RETURNING id, title, author_id, summary, isbn, language_id
            "#,
        )
        .bind(&input.title)
        .bind(input.author_id)
        .bind(&input.summary)
        .bind(&input.isbn)
        .bind(input.language_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        Self::replace_genres(&mut tx, id, &input.genre_ids).await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        if !genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[])",
            )
            .bind(book_id)
            .bind(genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete a book and its copies. Refused while a copy is on loan or reserved.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let held: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_instances WHERE book_id = $1 AND status IN ($2, $3)",
        )
        .bind(id)
        .bind(LoanStatus::OnLoan)
        .bind(LoanStatus::Reserved)
        .fetch_one(&mut *tx)
        .await?;

        if held > 0 {
            return Err(AppError::Conflict(format!(
                "Book {} has {} cop(ies) on loan or reserved",
                id, held
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
