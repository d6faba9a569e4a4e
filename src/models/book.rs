//! Book model, catalog listing query and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::author::{AuthorOption, AuthorSummary};
use super::copy::CopyView;
use super::{clean, not_blank};

/// Book row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book detail view with author and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub author: AuthorSummary,
    pub copies: Vec<CopyView>,
}

/// Create / update book request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title can't be blank"))]
    pub title: String,
    pub author_id: Option<i64>,
}

impl BookInput {
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author_id: self.author_id,
        }
    }
}

impl From<&Book> for BookInput {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author_id: Some(book.author_id),
        }
    }
}

/// Whether creating a book also provisions its first copy.
/// Only the bulk import skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCopy {
    Provision,
    Skip,
}

/// Book form draft with the author choices
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookForm {
    pub values: BookInput,
    pub authors: Vec<AuthorOption>,
}

/// Entry of a book drop-down in copy forms
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookOption {
    pub id: i64,
    pub label: String,
}

// =============================================================================
// Catalog listing
// =============================================================================

/// Sortable columns of the catalog listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortColumn {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "author")]
    Author,
    #[serde(rename = "copyCount")]
    CopyCount,
}

impl FromStr for SortColumn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortColumn::Title),
            "author" => Ok(SortColumn::Author),
            "copyCount" | "copy_count" => Ok(SortColumn::CopyCount),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

/// Raw query parameters of `GET /books`
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Substring searched in title, author first name and author last name
    pub search: Option<String>,
    /// title, author or copyCount; anything else uses the default order
    pub sort: Option<String>,
    /// asc or desc (default: asc)
    pub direction: Option<String>,
}

/// Catalog query after resolving defaults and unknown values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    /// `None` means author last name, first name, then title, all ascending
    pub sort: Option<SortColumn>,
    pub direction: SortDirection,
}

impl From<&BookQuery> for CatalogQuery {
    fn from(query: &BookQuery) -> Self {
        let direction = match query.direction.as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self {
            search: clean(query.search.as_deref()),
            sort: query.sort.as_deref().and_then(|s| s.parse().ok()),
            direction,
        }
    }
}

impl CatalogQuery {
    /// Case-folded `LIKE` pattern for the search term, with wildcards escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| {
            let mut pattern = String::with_capacity(term.len() + 2);
            pattern.push('%');
            for c in term.to_lowercase().chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }
}

/// One row of the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookListing {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub author_first_name: Option<String>,
    pub author_last_name: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub author_name: String,
    pub copy_count: i64,
    pub loaned_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Catalog listing with the query that produced it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookList {
    pub books: Vec<BookListing>,
    pub total: usize,
    pub search: Option<String>,
    /// Resolved sort column, absent for the default order
    pub sort: Option<SortColumn>,
    pub direction: SortDirection,
}
