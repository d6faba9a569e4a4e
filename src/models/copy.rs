//! Copy (physical instance of a book) model and loan state

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookOption;
use super::clean;
use crate::error::{AppResult, FieldErrors};

/// Copy row. `borrower` and `loan_date` are two nullable columns; use
/// [`Copy::loan_state`] to read them as one value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Copy {
    pub id: i64,
    pub book_id: i64,
    pub borrower: Option<String>,
    pub loan_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Copy {
    pub fn loan_state(&self) -> LoanState {
        LoanState::from_columns(self.borrower.as_deref(), self.loan_date)
    }
}

/// Loan state of a copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoanState {
    Available,
    Loaned {
        borrower: String,
        /// Absent only when the copy was edited by hand without a date
        since: Option<NaiveDate>,
    },
}

impl LoanState {
    /// Read the persisted columns. A copy is loaned when it has a non-blank
    /// borrower; a date without a borrower still counts as available.
    pub fn from_columns(borrower: Option<&str>, loan_date: Option<NaiveDate>) -> Self {
        match borrower.map(str::trim).filter(|b| !b.is_empty()) {
            Some(borrower) => LoanState::Loaned {
                borrower: borrower.to_string(),
                since: loan_date,
            },
            None => LoanState::Available,
        }
    }

    /// Loan to `borrower` starting `today`. Any previous loan is replaced.
    pub fn loan(borrower: Option<&str>, today: NaiveDate) -> AppResult<Self> {
        match clean(borrower) {
            Some(borrower) => Ok(LoanState::Loaned {
                borrower,
                since: Some(today),
            }),
            None => Err(crate::error::AppError::Validation(FieldErrors::single(
                "borrower",
                "A borrower name is required to loan a copy",
            ))),
        }
    }

    pub fn is_loaned(&self) -> bool {
        matches!(self, LoanState::Loaned { .. })
    }

    /// Column values to persist
    pub fn columns(&self) -> (Option<&str>, Option<NaiveDate>) {
        match self {
            LoanState::Available => (None, None),
            LoanState::Loaned { borrower, since } => (Some(borrower.as_str()), *since),
        }
    }
}

/// Copy as returned by the API, with its loan state spelled out
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopyView {
    #[serde(flatten)]
    pub copy: Copy,
    pub loan: LoanState,
    pub is_loaned: bool,
}

impl From<Copy> for CopyView {
    fn from(copy: Copy) -> Self {
        let loan = copy.loan_state();
        Self {
            is_loaned: loan.is_loaned(),
            loan,
            copy,
        }
    }
}

/// Copy listing row / detail view joined with its book and author
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopyDetails {
    #[serde(flatten)]
    pub copy: CopyView,
    pub book_title: String,
    pub author_id: i64,
    pub author_name: String,
}

/// Flat row behind [`CopyDetails`]
#[derive(Debug, Clone, FromRow)]
pub struct CopyDetailsRow {
    pub id: i64,
    pub book_id: i64,
    pub borrower: Option<String>,
    pub loan_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub book_title: String,
    pub author_id: i64,
    pub author_first_name: Option<String>,
    pub author_last_name: String,
}

impl From<CopyDetailsRow> for CopyDetails {
    fn from(row: CopyDetailsRow) -> Self {
        let author_name =
            super::author::full_name(row.author_first_name.as_deref(), &row.author_last_name);
        Self {
            copy: CopyView::from(Copy {
                id: row.id,
                book_id: row.book_id,
                borrower: row.borrower,
                loan_date: row.loan_date,
                created_at: row.created_at,
                updated_at: row.updated_at,
            }),
            book_title: row.book_title,
            author_id: row.author_id,
            author_name,
        }
    }
}

/// Raw create / update request. Borrower and loan date are taken as given,
/// independently of each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CopyInput {
    pub book_id: Option<i64>,
    pub borrower: Option<String>,
    pub loan_date: Option<NaiveDate>,
}

impl CopyInput {
    pub fn normalized(&self) -> Self {
        Self {
            book_id: self.book_id,
            borrower: clean(self.borrower.as_deref()),
            loan_date: self.loan_date,
        }
    }
}

impl From<&Copy> for CopyInput {
    fn from(copy: &Copy) -> Self {
        Self {
            book_id: Some(copy.book_id),
            borrower: copy.borrower.clone(),
            loan_date: copy.loan_date,
        }
    }
}

/// Loan request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoanRequest {
    pub borrower: Option<String>,
}

/// Copy status filter of `GET /copies`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    Available,
    Loaned,
}

impl CopyStatus {
    /// Unknown values mean "no filter"
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value.map(str::trim) {
            Some("available") => Some(CopyStatus::Available),
            Some("loaned") => Some(CopyStatus::Loaned),
            _ => None,
        }
    }
}

/// Query parameters of `GET /copies`
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams, ToSchema)]
pub struct CopyQuery {
    /// available or loaned; anything else lists every copy
    pub status: Option<String>,
}

/// Query parameters of `GET /copies/new`
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams, ToSchema)]
pub struct NewCopyQuery {
    /// Book to pre-select
    pub book_id: Option<i64>,
}

/// Copy form draft with the book choices
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CopyForm {
    pub values: CopyInput,
    pub books: Vec<BookOption>,
}
