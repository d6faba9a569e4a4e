//! Bulk import payload and report.
//!
//! Rows reference each other through external numeric ids (the `id` column of
//! the source spreadsheet), which are remapped to generated keys on insert.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::clean;
use crate::error::FieldErrors;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportAuthor {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportBook {
    pub id: i64,
    pub title: Option<String>,
    /// External id of the author
    pub author: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportCopy {
    /// External id of the book
    pub book: i64,
    pub borrower: Option<String>,
    /// YYYY-MM-DD
    pub loan_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ImportRequest {
    #[serde(default)]
    pub authors: Vec<ImportAuthor>,
    #[serde(default)]
    pub books: Vec<ImportBook>,
    #[serde(default)]
    pub copies: Vec<ImportCopy>,
}

/// Author row ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedAuthor {
    pub external_id: i64,
    pub first_name: Option<String>,
    pub last_name: String,
}

/// Book row ready to insert, still keyed by the external author id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedBook {
    pub external_id: i64,
    pub title: String,
    pub author: i64,
}

/// Copy row ready to insert, still keyed by the external book id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedCopy {
    pub book: i64,
    pub borrower: Option<String>,
    pub loan_date: Option<NaiveDate>,
}

/// Normalized import, checked before anything is written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub authors: Vec<ImportedAuthor>,
    pub books: Vec<ImportedBook>,
    pub copies: Vec<ImportedCopy>,
}

impl ImportRequest {
    /// Trim every cell and check required values. All offending rows are reported.
    pub fn into_plan(self) -> Result<ImportPlan, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut plan = ImportPlan::default();

        for (idx, row) in self.authors.into_iter().enumerate() {
            match clean(row.last_name.as_deref()) {
                Some(last_name) => plan.authors.push(ImportedAuthor {
                    external_id: row.id,
                    first_name: clean(row.first_name.as_deref()),
                    last_name,
                }),
                None => errors.add(format!("authors[{}].last_name", idx), "can't be blank"),
            }
        }

        for (idx, row) in self.books.into_iter().enumerate() {
            match clean(row.title.as_deref()) {
                Some(title) => plan.books.push(ImportedBook {
                    external_id: row.id,
                    title,
                    author: row.author,
                }),
                None => errors.add(format!("books[{}].title", idx), "can't be blank"),
            }
        }

        for (idx, row) in self.copies.into_iter().enumerate() {
            let loan_date = match clean(row.loan_date.as_deref()) {
                Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                    Ok(date) => Some(date),
                    Err(_) => {
                        errors.add(
                            format!("copies[{}].loan_date", idx),
                            format!("'{}' is not a YYYY-MM-DD date", raw),
                        );
                        continue;
                    }
                },
                None => None,
            };
            plan.copies.push(ImportedCopy {
                book: row.book,
                borrower: clean(row.borrower.as_deref()),
                loan_date,
            });
        }

        if errors.is_empty() {
            Ok(plan)
        } else {
            Err(errors)
        }
    }
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportReport {
    pub authors: u64,
    pub books: u64,
    pub copies: u64,
    /// Books whose author id did not match any imported author
    pub skipped_books: u64,
    /// Copies whose book id did not match any imported book
    pub skipped_copies: u64,
}
