//! Dashboard summary model

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Copy totals. `available` is always `total - loaned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CopyTotals {
    pub total: i64,
    pub loaned: i64,
    pub available: i64,
}

impl CopyTotals {
    pub fn new(total: i64, loaned: i64) -> Self {
        Self {
            total,
            loaned,
            available: total - loaned,
        }
    }
}

/// Recently catalogued book
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RecentBook {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    #[sqlx(skip)]
    pub author_name: String,
    #[serde(skip)]
    pub author_first_name: Option<String>,
    #[serde(skip)]
    pub author_last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Currently loaned copy
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct RecentLoan {
    pub copy_id: i64,
    pub book_id: i64,
    pub book_title: String,
    #[sqlx(skip)]
    pub author_name: String,
    #[serde(skip)]
    pub author_first_name: Option<String>,
    #[serde(skip)]
    pub author_last_name: String,
    pub borrower: String,
    pub loan_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub total_books: i64,
    pub total_authors: i64,
    pub copies: CopyTotals,
    pub recent_books: Vec<RecentBook>,
    pub recent_loans: Vec<RecentLoan>,
}
