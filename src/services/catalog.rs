//! Catalog browsing and authoring service

use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        author::AuthorInput,
        book::BookInput,
        book_instance::BookInstanceInput,
        genre::NameInput,
        Author, AuthorDetail, Book, BookDetail, BookInstance, BookInstanceDetail, BookSummary,
        Capability, Genre, GenreDetail, Language, Page, PageRequest, UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    // =========================================================================
    // BROWSING
    // =========================================================================

    pub async fn list_books(&self, page: Option<i64>) -> AppResult<Page<BookSummary>> {
        let request = PageRequest::new(page, self.config.books_per_page)?;
        let (books, total) = self.repository.books.list(request).await?;
        Ok(Page::new(books, total, request))
    }

    pub async fn list_authors(&self, page: Option<i64>) -> AppResult<Page<Author>> {
        let request = PageRequest::new(page, self.config.authors_per_page)?;
        let (authors, total) = self.repository.authors.list(request).await?;
        Ok(Page::new(authors, total, request))
    }

    pub async fn list_genres(&self, page: Option<i64>) -> AppResult<Page<Genre>> {
        let request = PageRequest::new(page, self.config.genres_per_page)?;
        let (genres, total) = self.repository.genres.list(request).await?;
        Ok(Page::new(genres, total, request))
    }

    pub async fn list_languages(&self, page: Option<i64>) -> AppResult<Page<Language>> {
        let request = PageRequest::new(page, self.config.languages_per_page)?;
        let (languages, total) = self.repository.languages.list(request).await?;
        Ok(Page::new(languages, total, request))
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let today = Utc::now().date_naive();
        self.repository.books.get_detail(id, today).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail::new(author, books))
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<GenreDetail> {
        let genre = self.repository.genres.get_by_id(id).await?;
        let books = self.repository.books.list_by_genre(id).await?;
        Ok(GenreDetail {
            id: genre.id,
            name: genre.name,
            books,
        })
    }

    /// Copy detail. The borrower is shown to librarians and to the borrower only.
    pub async fn get_instance(
        &self,
        claims: Option<&UserClaims>,
        id: Uuid,
    ) -> AppResult<BookInstanceDetail> {
        let today = Utc::now().date_naive();
        let mut detail = self.repository.instances.get_detail(id, today).await?;

        let may_see_borrower = claims.map_or(false, |claims| {
            claims.has(Capability::CatalogManage)
                || detail.borrower.as_ref().map(|b| b.id) == Some(claims.user_id)
        });
        if !may_see_borrower {
            detail.borrower = None;
        }
        Ok(detail)
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn create_author(&self, claims: &UserClaims, input: AuthorInput) -> AppResult<Author> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let author = self.repository.authors.create(&input).await?;
        tracing::info!(author_id = author.id, user_id = claims.user_id, "author created");
        Ok(author)
    }

    pub async fn update_author(
        &self,
        claims: &UserClaims,
        id: i32,
        input: AuthorInput,
    ) -> AppResult<Author> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let author = self.repository.authors.update(id, &input).await?;
        tracing::info!(author_id = id, user_id = claims.user_id, "author updated");
        Ok(author)
    }

    /// Refused while any book references the author
    pub async fn delete_author(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_catalog_manage()?;
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, user_id = claims.user_id, "author deleted");
        Ok(())
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn create_book(&self, claims: &UserClaims, input: BookInput) -> AppResult<Book> {
        claims.require_catalog_manage()?;
        let input = input.check()?;
        self.check_book_references(&input).await?;

        let book = self.repository.books.create(&input).await?;
        tracing::info!(book_id = book.id, user_id = claims.user_id, "book created");
        Ok(book)
    }

    pub async fn update_book(&self, claims: &UserClaims, id: i32, input: BookInput) -> AppResult<Book> {
        claims.require_catalog_manage()?;
        let input = input.check()?;
        self.check_book_references(&input).await?;

        let book = self.repository.books.update(id, &input).await?;
        tracing::info!(book_id = id, user_id = claims.user_id, "book updated");
        Ok(book)
    }

    /// Deletes the book with its copies, unless a copy is on loan or reserved
    pub async fn delete_book(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_catalog_manage()?;
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, user_id = claims.user_id, "book deleted");
        Ok(())
    }

    async fn check_book_references(&self, input: &BookInput) -> AppResult<()> {
        if !self.repository.authors.exists(input.author_id).await? {
            return Err(AppError::invalid(
                "author_id",
                format!("Author {} does not exist", input.author_id),
            ));
        }

        if let Some(language_id) = input.language_id {
            if !self.repository.languages.exists(language_id).await? {
                return Err(AppError::invalid(
                    "language_id",
                    format!("Language {} does not exist", language_id),
                ));
            }
        }

        let missing = self.repository.genres.missing_ids(&input.genre_ids).await?;
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
            return Err(AppError::invalid(
                "genre_ids",
                format!("Unknown genre(s): {}", ids.join(", ")),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // GENRES / LANGUAGES
    // =========================================================================

    pub async fn create_genre(&self, claims: &UserClaims, input: NameInput) -> AppResult<Genre> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let genre = self.repository.genres.create(&input).await?;
        tracing::info!(genre_id = genre.id, user_id = claims.user_id, "genre created");
        Ok(genre)
    }

    pub async fn update_genre(&self, claims: &UserClaims, id: i32, input: NameInput) -> AppResult<Genre> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let genre = self.repository.genres.update(id, &input).await?;
        tracing::info!(genre_id = id, user_id = claims.user_id, "genre updated");
        Ok(genre)
    }

    /// Removes the genre and its book links; the books stay
    pub async fn delete_genre(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_catalog_manage()?;
        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = id, user_id = claims.user_id, "genre deleted");
        Ok(())
    }

    pub async fn create_language(&self, claims: &UserClaims, input: NameInput) -> AppResult<Language> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let language = self.repository.languages.create(&input).await?;
        tracing::info!(language_id = language.id, user_id = claims.user_id, "language created");
        Ok(language)
    }

    pub async fn update_language(
        &self,
        claims: &UserClaims,
        id: i32,
        input: NameInput,
    ) -> AppResult<Language> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        let language = self.repository.languages.update(id, &input).await?;
        tracing::info!(language_id = id, user_id = claims.user_id, "language updated");
        Ok(language)
    }

    pub async fn delete_language(&self, claims: &UserClaims, id: i32) -> AppResult<()> {
        claims.require_catalog_manage()?;
        self.repository.languages.delete(id).await?;
        tracing::info!(language_id = id, user_id = claims.user_id, "language deleted");
        Ok(())
    }

    // =========================================================================
    // BOOK INSTANCES
    // =========================================================================

    pub async fn create_instance(
        &self,
        claims: &UserClaims,
        book_id: i32,
        input: BookInstanceInput,
    ) -> AppResult<BookInstance> {
        claims.require_catalog_manage()?;
        let input = input.check()?;

        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::invalid(
                "book_id",
                format!("Book {} does not exist", book_id),
            ));
        }
        self.check_borrower(input.borrower_id).await?;

        let instance = self.repository.instances.create(book_id, &input).await?;
        tracing::info!(instance_id = %instance.id, book_id, user_id = claims.user_id, "book instance created");
        Ok(instance)
    }

    /// Full replacement; the status change must follow the copy lifecycle
    pub async fn update_instance(
        &self,
        claims: &UserClaims,
        id: Uuid,
        input: BookInstanceInput,
    ) -> AppResult<BookInstance> {
        claims.require_catalog_manage()?;
        let input = input.check()?;
        self.check_borrower(input.borrower_id).await?;

        let instance = self.repository.instances.update(id, &input).await?;
        tracing::info!(instance_id = %id, status = %instance.status, user_id = claims.user_id, "book instance updated");
        Ok(instance)
    }

    pub async fn delete_instance(&self, claims: &UserClaims, id: Uuid) -> AppResult<()> {
        claims.require_catalog_manage()?;
        self.repository.instances.delete(id).await?;
        tracing::info!(instance_id = %id, user_id = claims.user_id, "book instance deleted");
        Ok(())
    }

    async fn check_borrower(&self, borrower_id: Option<i32>) -> AppResult<()> {
        if let Some(borrower_id) = borrower_id {
            if self.repository.users.get_short(borrower_id).await?.is_none() {
                return Err(AppError::invalid(
                    "borrower_id",
                    format!("User {} does not exist", borrower_id),
                ));
            }
        }
        Ok(())
    }
}
