//! Copies repository: CRUD and the loan/return updates

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::copy::{Copy, CopyDetails, CopyDetailsRow, CopyInput, CopyStatus, LoanState},
};

/// SQL predicate (on alias `c`) matching loaned copies
pub(crate) const LOANED_PREDICATE: &str = "(c.borrower IS NOT NULL AND TRIM(c.borrower) <> '')";

const DETAILS_SELECT: &str = r#"
    SELECT c.id, c.book_id, c.borrower, c.loan_date, c.created_at, c.updated_at,
           b.title AS book_title, b.author_id,
           a.first_name AS author_first_name, a.last_name AS author_last_name
    FROM copies c
    JOIN books b ON b.id = c.book_id
    JOIN authors a ON a.id = b.author_id
"#;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Copy with id {} not found", id))
}

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Copy joined with its book and author
    pub async fn get_details(&self, id: i64) -> AppResult<CopyDetails> {
        let query = format!("{} WHERE c.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, CopyDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(CopyDetails::from)
            .ok_or_else(|| not_found(id))
    }

    /// All copies ordered by book title, optionally restricted to one loan status
    pub async fn list(&self, status: Option<CopyStatus>) -> AppResult<Vec<CopyDetails>> {
        let condition = match status {
            Some(CopyStatus::Available) => format!("WHERE NOT {}", LOANED_PREDICATE),
            Some(CopyStatus::Loaned) => format!("WHERE {}", LOANED_PREDICATE),
            None => String::new(),
        };
        let query = format!("{} {} ORDER BY b.title, c.id", DETAILS_SELECT, condition);

        let rows = sqlx::query_as::<_, CopyDetailsRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CopyDetails::from).collect())
    }

    /// Copies of one book
    pub async fn list_by_book(&self, book_id: i64) -> AppResult<Vec<Copy>> {
        let rows = sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE book_id = $1 ORDER BY id")
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: &CopyInput, book_id: i64) -> AppResult<Copy> {
        let mut conn = self.pool.acquire().await?;
        Self::insert(&mut *conn, book_id, data.borrower.as_deref(), data.loan_date).await
    }

    /// Insert on a caller-provided connection (used inside transactions)
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        book_id: i64,
        borrower: Option<&str>,
        loan_date: Option<NaiveDate>,
    ) -> AppResult<Copy> {
        let row = sqlx::query_as::<_, Copy>(
            r#"
            INSERT INTO copies (book_id, borrower, loan_date)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(borrower)
        .bind(loan_date)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Raw update: every column is replaced with the given values
    pub async fn update(&self, id: i64, data: &CopyInput, book_id: i64) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>(
            r#"
            UPDATE copies
            SET book_id = $1, borrower = $2, loan_date = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(&data.borrower)
        .bind(data.loan_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    /// Persist a loan state in one single-row update.
    ///
    /// With `only_if_available`, the update only applies to a copy that is not
    /// loaned; `Ok(None)` then means the copy exists but is already loaned.
    pub async fn set_loan_state(
        &self,
        id: i64,
        state: &LoanState,
        only_if_available: bool,
    ) -> AppResult<Option<Copy>> {
        let (borrower, loan_date) = state.columns();
        let guard = if only_if_available {
            format!(" AND NOT {}", LOANED_PREDICATE)
        } else {
            String::new()
        };
        let query = format!(
            r#"
            UPDATE copies c
            SET borrower = $1, loan_date = $2, updated_at = NOW()
            WHERE c.id = $3{}
            RETURNING c.*
            "#,
            guard
        );

        let updated = sqlx::query_as::<_, Copy>(&query)
            .bind(borrower)
            .bind(loan_date)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(copy) => Ok(Some(copy)),
            None if only_if_available && self.exists(id).await? => Ok(None),
            None => Err(not_found(id)),
        }
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM copies WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
