//! Bulk import of authors, books and copies keyed by external ids

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::DefaultCopy,
        import::{ImportReport, ImportRequest},
    },
    repository::{
        authors::AuthorsRepository, books::BooksRepository, copies::CopiesRepository,
        Repository,
    },
};

#[derive(Clone)]
pub struct ImportService {
    repository: Repository,
}

impl ImportService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Import all three tables in one transaction.
    ///
    /// Books keep no automatic copy: the imported copies table is authoritative,
    /// including loan columns that would not satisfy the loan rules.
    pub async fn import(&self, request: ImportRequest) -> AppResult<ImportReport> {
        let plan = request.into_plan().map_err(AppError::Validation)?;
        let mut report = ImportReport::default();
        let mut tx = self.repository.pool.begin().await?;

        let mut authors_map: HashMap<i64, i64> = HashMap::new();
        for author in &plan.authors {
            let created =
                AuthorsRepository::insert(&mut *tx, author.first_name.as_deref(), &author.last_name)
                    .await?;
            authors_map.insert(author.external_id, created.id);
            report.authors += 1;
        }

        let mut books_map: HashMap<i64, i64> = HashMap::new();
        for book in &plan.books {
            let Some(&author_id) = authors_map.get(&book.author) else {
                tracing::warn!(
                    "Import: skipping book {} '{}', unknown author {}",
                    book.external_id,
                    book.title,
                    book.author
                );
                report.skipped_books += 1;
                continue;
            };
            let created =
                BooksRepository::insert(&mut *tx, &book.title, author_id, DefaultCopy::Skip).await?;
            books_map.insert(book.external_id, created.id);
            report.books += 1;
        }

        for copy in &plan.copies {
            let Some(&book_id) = books_map.get(&copy.book) else {
                report.skipped_copies += 1;
                continue;
            };
            CopiesRepository::insert(&mut *tx, book_id, copy.borrower.as_deref(), copy.loan_date)
                .await?;
            report.copies += 1;
        }

        tx.commit().await?;

        tracing::info!(
            "Import completed: {} authors, {} books, {} copies ({} books and {} copies skipped)",
            report.authors,
            report.books,
            report.copies,
            report.skipped_books,
            report.skipped_copies
        );
        Ok(report)
    }
}
