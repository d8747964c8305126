//! Book model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book_instance::CopySummary;
use super::genre::{Genre, Language};
use crate::error::{AppError, AppResult};

static ISBN13: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13}$").expect("valid ISBN regex"));

/// Book as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
}

/// Listing entry: title with its author
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
}

/// Author reference embedded in book details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorShort {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Book with author, language, genres and its copies. Borrowers are not exposed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: AuthorShort,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub instances: Vec<CopySummary>,
}

/// Create / replace book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    pub author_id: i32,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1 to 1000 characters"))]
    pub summary: String,
    /// 13 digit ISBN; hyphens and spaces are ignored
    pub isbn: String,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
}

/// Strip hyphens and spaces from an ISBN as typed by a librarian
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

impl BookInput {
    /// Normalize the input and apply field rules
    pub fn check(mut self) -> AppResult<Self> {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.isbn = normalize_isbn(&self.isbn);
        self.validate()?;

        if !ISBN13.is_match(&self.isbn) {
            return Err(AppError::invalid("isbn", "ISBN must be exactly 13 digits"));
        }

        self.genre_ids.sort_unstable();
        self.genre_ids.dedup();
        Ok(self)
    }
}
