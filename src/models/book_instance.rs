//! Book instance (loanable copy) model and its borrowing state

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::UserShort;
use crate::error::{AppError, AppResult};

/// Borrowing status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "maintenance",
            LoanStatus::OnLoan => "on_loan",
            LoanStatus::Available => "available",
            LoanStatus::Reserved => "reserved",
        }
    }

    /// Whether a copy in this status may name a borrower
    pub fn holds_borrower(&self) -> bool {
        matches!(self, LoanStatus::OnLoan | LoanStatus::Reserved)
    }

    /// Allowed status changes. Keeping the current status is always allowed.
    ///
    /// Maintenance -> Available -> Reserved | OnLoan -> Available, plus
    /// Reserved -> OnLoan (reservation collected) and Available -> Maintenance.
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Maintenance, Available)
                    | (Available, Reserved)
                    | (Available, OnLoan)
                    | (Available, Maintenance)
                    | (Reserved, OnLoan)
                    | (Reserved, Available)
                    | (OnLoan, Available)
            )
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Maintenance
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maintenance" => Ok(LoanStatus::Maintenance),
            "on_loan" => Ok(LoanStatus::OnLoan),
            "available" => Ok(LoanStatus::Available),
            "reserved" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as text)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Check the loan-state invariants of a copy:
/// `due_back` is set exactly when the copy is on loan, a copy on loan has a
/// borrower, and only copies on loan or reserved name a borrower.
pub fn check_loan_state(
    status: LoanStatus,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
) -> AppResult<()> {
    let on_loan = status == LoanStatus::OnLoan;

    if on_loan && due_back.is_none() {
        return Err(AppError::invalid("due_back", "A copy on loan needs a due date"));
    }
    if !on_loan && due_back.is_some() {
        return Err(AppError::invalid("due_back", "Only copies on loan have a due date"));
    }
    if on_loan && borrower_id.is_none() {
        return Err(AppError::invalid("borrower_id", "A copy on loan needs a borrower"));
    }
    if borrower_id.is_some() && !status.holds_borrower() {
        return Err(AppError::invalid(
            "borrower_id",
            "Only copies on loan or reserved have a borrower",
        ));
    }
    Ok(())
}

/// Book instance as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstance {
    pub fn check_invariants(&self) -> AppResult<()> {
        check_loan_state(self.status, self.due_back, self.borrower_id)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == LoanStatus::OnLoan && self.due_back.map(|d| d < today).unwrap_or(false)
    }

    /// Public view of the copy, without its borrower
    pub fn summary(self, today: NaiveDate) -> CopySummary {
        CopySummary {
            is_overdue: self.is_overdue(today),
            id: self.id,
            imprint: self.imprint,
            status: self.status,
            due_back: self.due_back,
        }
    }
}

/// Copy as listed in book details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopySummary {
    pub id: Uuid,
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub is_overdue: bool,
}

/// Copy with its book title and borrower
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookInstanceDetail {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<UserShort>,
    pub is_overdue: bool,
}

/// Create / replace book instance request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookInstanceInput {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1 to 200 characters"))]
    pub imprint: String,
    #[serde(default)]
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl BookInstanceInput {
    pub fn check(mut self) -> AppResult<Self> {
        self.imprint = self.imprint.trim().to_string();
        self.validate()?;
        check_loan_state(self.status, self.due_back, self.borrower_id)?;
        Ok(self)
    }
}
