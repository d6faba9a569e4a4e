//! Data models for Shelfmark

pub mod author;
pub mod book;
pub mod copy;
pub mod dashboard;
pub mod import;

use std::borrow::Cow;

use validator::ValidationError;

// Re-export commonly used types
pub use author::{Author, AuthorInput};
pub use book::{Book, BookInput, BookListing, BookQuery, CatalogQuery, DefaultCopy};
pub use copy::{Copy, CopyInput, LoanState};
pub use dashboard::DashboardSummary;

/// Trim a free-text value; blank becomes `None`
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// `validator` rule: the value must contain something besides whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("can't be blank"));
        return Err(error);
    }
    Ok(())
}
