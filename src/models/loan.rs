//! Loan views of book instances and the renewal rules

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::UserShort;
use crate::error::{AppError, AppResult};

/// Renewals may push the due date at most this far ahead
pub const MAX_RENEWAL_DAYS: i64 = 28;

/// Proposed extension when a renewal is first displayed
pub const DEFAULT_RENEWAL_DAYS: i64 = 21;

/// Date offered by default on the renewal form
pub fn proposed_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(DEFAULT_RENEWAL_DAYS)
}

/// Latest date a renewal may request
pub fn latest_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(MAX_RENEWAL_DAYS)
}

/// Check a requested due date against the renewal window `[today, today + 4 weeks]`
pub fn validate_renewal_date(requested: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if requested < today {
        return Err(AppError::invalid(
            "renewal_date",
            "Invalid date - renewal in past",
        ));
    }
    if requested > latest_renewal_date(today) {
        return Err(AppError::invalid(
            "renewal_date",
            "Invalid date - renewal more than 4 weeks ahead",
        ));
    }
    Ok(())
}

/// Row shape of loan listing queries
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: NaiveDate,
    pub borrower_id: i32,
    pub borrower_username: String,
    pub borrower_first_name: String,
    pub borrower_last_name: String,
}

impl LoanRow {
    pub fn into_entry(self, today: NaiveDate, with_borrower: bool) -> LoanEntry {
        let borrower = with_borrower.then(|| UserShort {
            id: self.borrower_id,
            username: self.borrower_username,
            first_name: self.borrower_first_name,
            last_name: self.borrower_last_name,
        });
        LoanEntry {
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            is_overdue: self.due_back < today,
            borrower,
        }
    }
}

/// A copy currently on loan
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanEntry {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: NaiveDate,
    pub is_overdue: bool,
    /// Present in the librarian listing only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower: Option<UserShort>,
}

/// Renew loan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RenewLoan {
    /// New due date (YYYY-MM-DD), between today and four weeks ahead
    pub renewal_date: NaiveDate,
}

/// What the renewal form shows before submission
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewalForm {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub due_back: Option<NaiveDate>,
    pub proposed_renewal_date: NaiveDate,
    pub latest_renewal_date: NaiveDate,
}

/// Result of a successful renewal
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewalConfirmation {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub previous_due_back: Option<NaiveDate>,
    pub due_back: NaiveDate,
    pub message: String,
}
