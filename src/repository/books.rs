//! Books repository: CRUD and the catalog listing query

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::full_name,
        book::{Book, BookListing, BookOption, CatalogQuery, DefaultCopy, SortColumn},
    },
    repository::copies::CopiesRepository,
};

/// Catalog listing: one row per book, copies aggregated so they never fan out
const LISTING_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, b.created_at,
           a.first_name AS author_first_name,
           a.last_name AS author_last_name,
           COUNT(c.id) AS copy_count,
           COUNT(c.id) FILTER (WHERE c.borrower IS NOT NULL AND TRIM(c.borrower) <> '') AS loaned_count
    FROM books b
    JOIN authors a ON a.id = b.author_id
    LEFT JOIN copies c ON c.book_id = b.id
"#;

const SEARCH_CONDITION: &str = r#"
    WHERE LOWER(b.title) LIKE $1 ESCAPE '\'
       OR LOWER(COALESCE(a.first_name, '')) LIKE $1 ESCAPE '\'
       OR LOWER(a.last_name) LIKE $1 ESCAPE '\'
"#;

/// Sort key for the author first name; a missing first name sorts as empty
const FIRST_NAME_KEY: &str = "COALESCE(a.first_name, '')";

/// ORDER BY clause for a resolved catalog query
pub(crate) fn order_by(query: &CatalogQuery) -> String {
    let dir = query.direction.as_sql();
    match query.sort {
        Some(SortColumn::Title) => format!("b.title {}", dir),
        Some(SortColumn::Author) => {
            format!("a.last_name {dir}, {first} {dir}", dir = dir, first = FIRST_NAME_KEY)
        }
        // No tie-breaker: equal counts keep whatever order the store yields
        Some(SortColumn::CopyCount) => format!("COUNT(c.id) {}", dir),
        None => format!("a.last_name ASC, {} ASC, b.title ASC", FIRST_NAME_KEY),
    }
}

/// Full listing statement for a resolved catalog query
pub(crate) fn listing_sql(query: &CatalogQuery) -> String {
    let condition = if query.search.is_some() { SEARCH_CONDITION } else { "" };
    format!(
        "{}{}\n    GROUP BY b.id, a.id\n    ORDER BY {}",
        LISTING_SELECT,
        condition,
        order_by(query)
    )
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Books of one author, by title
    pub async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE author_id = $1 ORDER BY title",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Id / title pairs for copy forms
    pub async fn options(&self) -> AppResult<Vec<BookOption>> {
        let rows = sqlx::query_as::<_, BookOption>(
            "SELECT id, title AS label FROM books ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Catalog listing filtered and sorted according to `query`
    pub async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<BookListing>> {
        let sql = listing_sql(query);
        let mut builder = sqlx::query_as::<_, BookListing>(&sql);
        if let Some(pattern) = query.search_pattern() {
            builder = builder.bind(pattern);
        }

        let mut rows = builder.fetch_all(&self.pool).await?;
        for row in &mut rows {
            row.author_name = full_name(row.author_first_name.as_deref(), &row.author_last_name);
        }
        Ok(rows)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a book, with its first copy unless `default_copy` says otherwise
    pub async fn create(
        &self,
        title: &str,
        author_id: i64,
        default_copy: DefaultCopy,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;
        let book = Self::insert(&mut *tx, title, author_id, default_copy).await?;
        tx.commit().await?;
        Ok(book)
    }

    /// Insert on a caller-provided connection (used inside transactions)
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        title: &str,
        author_id: i64,
        default_copy: DefaultCopy,
    ) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author_id)
        .fetch_one(&mut *conn)
        .await?;

        if default_copy == DefaultCopy::Provision {
            CopiesRepository::insert(conn, book.id, None, None).await?;
        }

        Ok(book)
    }

    pub async fn update(&self, id: i64, title: &str, author_id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(author_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book together with its copies
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
