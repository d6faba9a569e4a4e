//! Dashboard summary service

use crate::{
    error::AppResult,
    models::{
        author::full_name,
        dashboard::{CopyTotals, DashboardSummary, RecentBook, RecentLoan},
    },
    repository::{copies::LOANED_PREDICATE, Repository},
};

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
    recent_limit: u32,
}

impl DashboardService {
    pub fn new(repository: Repository, recent_limit: u32) -> Self {
        Self {
            repository,
            recent_limit,
        }
    }

    /// Catalog totals plus the latest books and the latest open loans
    pub async fn summary(&self) -> AppResult<DashboardSummary> {
        let pool = &self.repository.pool;

        let total_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;
        let total_authors = self.repository.authors.count().await?;

        let (total_copies, loaned_copies): (i64, i64) = sqlx::query_as(&format!(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE {}) FROM copies c",
            LOANED_PREDICATE
        ))
        .fetch_one(pool)
        .await?;

        let mut recent_books = sqlx::query_as::<_, RecentBook>(
            r#"
            SELECT b.id, b.title, b.author_id, b.created_at,
                   a.first_name AS author_first_name, a.last_name AS author_last_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            ORDER BY b.created_at DESC, b.id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(self.recent_limit))
        .fetch_all(pool)
        .await?;
        for book in &mut recent_books {
            book.author_name = full_name(book.author_first_name.as_deref(), &book.author_last_name);
        }

        // Returned copies drop out of this list, however recent their loan was
        let mut recent_loans = sqlx::query_as::<_, RecentLoan>(&format!(
            r#"
            SELECT c.id AS copy_id, c.book_id, b.title AS book_title,
                   a.first_name AS author_first_name, a.last_name AS author_last_name,
                   c.borrower, c.loan_date
            FROM copies c
            JOIN books b ON b.id = c.book_id
            JOIN authors a ON a.id = b.author_id
            WHERE {}
            ORDER BY c.loan_date DESC NULLS LAST, c.id DESC
            LIMIT $1
            "#,
            LOANED_PREDICATE
        ))
        .bind(i64::from(self.recent_limit))
        .fetch_all(pool)
        .await?;
        for loan in &mut recent_loans {
            loan.author_name = full_name(loan.author_first_name.as_deref(), &loan.author_last_name);
        }

        Ok(DashboardSummary {
            total_books,
            total_authors,
            copies: CopyTotals::new(total_copies, loaned_copies),
            recent_books,
            recent_loans,
        })
    }
}
