//! Copy management service, including loans and returns

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::copy::{
        Copy, CopyDetails, CopyForm, CopyInput, CopyStatus, CopyView, LoanState,
    },
    repository::Repository,
};

use super::clock::Clock;

#[derive(Clone)]
pub struct CopiesService {
    repository: Repository,
    clock: Arc<dyn Clock>,
    /// Refuse to loan a copy that is already loaned
    strict_loans: bool,
}

impl CopiesService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>, strict_loans: bool) -> Self {
        Self {
            repository,
            clock,
            strict_loans,
        }
    }

    /// Copies ordered by book title; `status` is "available", "loaned" or anything else for all
    pub async fn list(&self, status: Option<&str>) -> AppResult<Vec<CopyDetails>> {
        self.repository.copies.list(CopyStatus::parse(status)).await
    }

    pub async fn get_details(&self, id: i64) -> AppResult<CopyDetails> {
        self.repository.copies.get_details(id).await
    }

    /// Raw create. Borrower and loan date are stored as given.
    pub async fn create(&self, data: &CopyInput) -> AppResult<Copy> {
        let data = data.normalized();
        let book_id = self.checked_book(data.book_id).await?;
        let copy = self.repository.copies.create(&data, book_id).await?;
        tracing::info!("Created copy id={} of book id={}", copy.id, copy.book_id);
        Ok(copy)
    }

    /// Raw update, bypassing the loan state machine
    pub async fn update(&self, id: i64, data: &CopyInput) -> AppResult<Copy> {
        let data = data.normalized();
        let book_id = self.checked_book(data.book_id).await?;
        let copy = self.repository.copies.update(id, &data, book_id).await?;
        tracing::info!("Updated copy id={}", copy.id);
        Ok(copy)
    }

    /// Delete a copy, returning the book it belonged to
    pub async fn delete(&self, id: i64) -> AppResult<i64> {
        let copy = self.repository.copies.get_by_id(id).await?;
        self.repository.copies.delete(id).await?;
        tracing::info!("Deleted copy id={} of book id={}", id, copy.book_id);
        Ok(copy.book_id)
    }

    /// Loan state for a loan starting today. Fails before touching the store
    /// when no borrower is given.
    pub fn prepare_loan(&self, borrower: Option<&str>) -> AppResult<LoanState> {
        LoanState::loan(borrower, self.clock.today()).map_err(|e| {
            tracing::warn!("Rejected loan without borrower name");
            e
        })
    }

    /// Loan a copy to `borrower`, dated today by the server clock.
    /// A copy that is already loaned is re-loaned unless strict loans are enabled.
    pub async fn loan(&self, id: i64, borrower: Option<&str>) -> AppResult<CopyView> {
        let state = self.prepare_loan(borrower)?;

        let copy = self
            .repository
            .copies
            .set_loan_state(id, &state, self.strict_loans)
            .await?
            .ok_or_else(|| AppError::Conflict(format!("Copy {} is already loaned", id)))?;

        tracing::info!("Loaned copy id={} to '{}'", copy.id, copy.borrower.as_deref().unwrap_or_default());
        Ok(copy.into())
    }

    /// Return a copy. Returning an available copy succeeds and changes nothing visible.
    pub async fn return_copy(&self, id: i64) -> AppResult<CopyView> {
        let copy = self
            .repository
            .copies
            .set_loan_state(id, &LoanState::Available, false)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))?;

        tracing::info!("Returned copy id={}", copy.id);
        Ok(copy.into())
    }

    /// Form draft: pre-filled from an existing copy, or from `book_id` for a new one
    pub async fn form(&self, id: Option<i64>, book_id: Option<i64>) -> AppResult<CopyForm> {
        let values = match id {
            Some(id) => CopyInput::from(&self.repository.copies.get_by_id(id).await?),
            None => CopyInput {
                book_id,
                ..CopyInput::default()
            },
        };
        let books = self.repository.books.options().await?;
        Ok(CopyForm { values, books })
    }

    async fn checked_book(&self, book_id: Option<i64>) -> AppResult<i64> {
        match book_id {
            None => Err(AppError::Validation(FieldErrors::single(
                "book_id",
                "A book must be selected",
            ))),
            Some(id) => {
                if self.repository.books.exists(id).await? {
                    Ok(id)
                } else {
                    Err(AppError::Validation(FieldErrors::single(
                        "book_id",
                        format!("Book {} does not exist", id),
                    )))
                }
            }
        }
    }
}
