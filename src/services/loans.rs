//! Loan listing and renewal service

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{
        loan::{latest_renewal_date, proposed_renewal_date, RenewalConfirmation, RenewalForm},
        LoanEntry, Page, PageRequest, UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    per_page: i64,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl LoansService {
    pub fn new(repository: Repository, config: &CatalogConfig) -> Self {
        Self {
            repository,
            per_page: config.loans_per_page,
        }
    }

    /// Copies on loan to the current user, soonest due first
    pub async fn list_my_loans(&self, claims: &UserClaims, page: Option<i64>) -> AppResult<Page<LoanEntry>> {
        let request = PageRequest::new(page, self.per_page)?;
        let (rows, total) = self
            .repository
            .loans
            .list_for_borrower(claims.user_id, request)
            .await?;

        let today = today();
        let entries = rows.into_iter().map(|row| row.into_entry(today, false)).collect();
        Ok(Page::new(entries, total, request))
    }

    /// Every copy on loan with its borrower (librarians only)
    pub async fn list_all_loans(&self, claims: &UserClaims, page: Option<i64>) -> AppResult<Page<LoanEntry>> {
        claims.require_catalog_manage()?;
        let request = PageRequest::new(page, self.per_page)?;
        let (rows, total) = self.repository.loans.list_on_loan(request).await?;

        let today = today();
        let entries = rows.into_iter().map(|row| row.into_entry(today, true)).collect();
        Ok(Page::new(entries, total, request))
    }

    /// Data for the renewal form, with the proposed date three weeks out
    pub async fn renewal_form(&self, claims: &UserClaims, id: Uuid) -> AppResult<RenewalForm> {
        claims.require_catalog_manage()?;
        let (instance, book_title) = self.repository.loans.get_renewal_target(id).await?;

        let today = today();
        Ok(RenewalForm {
            id: instance.id,
            book_id: instance.book_id,
            book_title,
            due_back: instance.due_back,
            proposed_renewal_date: proposed_renewal_date(today),
            latest_renewal_date: latest_renewal_date(today),
        })
    }

    /// Move the due date of a copy on loan. The capability check comes before
    /// any data access.
    pub async fn renew(
        &self,
        claims: &UserClaims,
        id: Uuid,
        renewal_date: NaiveDate,
    ) -> AppResult<RenewalConfirmation> {
        claims.require_catalog_manage()?;

        let confirmation = self.repository.loans.renew(id, renewal_date, today()).await?;
        tracing::info!(
            instance_id = %id,
            due_back = %confirmation.due_back,
            user_id = claims.user_id,
            "loan renewed"
        );
        Ok(confirmation)
    }
}
