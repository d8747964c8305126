//! Data models for the LocalLibrary catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod loan;
pub mod pagination;
pub mod summary;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail};
pub use book::{Book, BookDetail, BookSummary};
pub use book_instance::{BookInstance, BookInstanceDetail, CopySummary, LoanStatus};
pub use genre::{Genre, GenreDetail, Language};
pub use loan::LoanEntry;
pub use pagination::{Page, PageQuery, PageRequest};
pub use summary::{CatalogCounts, HomeSummary};
pub use user::{Capability, User, UserClaims, UserShort};
