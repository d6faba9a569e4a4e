//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;
use super::{clean, not_blank};

/// Author row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// "First Last", or just the last name when no first name is known
    pub fn full_name(&self) -> String {
        full_name(self.first_name.as_deref(), &self.last_name)
    }

    /// "Last First", used for alphabetical listings
    pub fn sort_key(&self) -> String {
        sort_key(self.first_name.as_deref(), &self.last_name)
    }
}

pub(crate) fn full_name(first_name: Option<&str>, last_name: &str) -> String {
    format!("{} {}", first_name.unwrap_or_default(), last_name)
        .trim()
        .to_string()
}

pub(crate) fn sort_key(first_name: Option<&str>, last_name: &str) -> String {
    match first_name.map(str::trim).filter(|f| !f.is_empty()) {
        Some(first) => format!("{} {}", last_name, first),
        None => last_name.to_string(),
    }
}

/// Author with its derived display names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorSummary {
    #[serde(flatten)]
    pub author: Author,
    pub full_name: String,
    pub sort_key: String,
}

impl From<Author> for AuthorSummary {
    fn from(author: Author) -> Self {
        Self {
            full_name: author.full_name(),
            sort_key: author.sort_key(),
            author,
        }
    }
}

/// Author detail view with its books (ordered by title)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: AuthorSummary,
    pub books: Vec<Book>,
}

/// Create / update author request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Last name can't be blank"))]
    pub last_name: String,
}

impl AuthorInput {
    /// Trimmed copy with a blank first name turned into `None`
    pub fn normalized(&self) -> Self {
        Self {
            first_name: clean(self.first_name.as_deref()),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

impl From<&Author> for AuthorInput {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
        }
    }
}

/// Entry of an author drop-down in book forms
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorOption {
    pub id: i64,
    pub label: String,
}

impl From<&Author> for AuthorOption {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            label: author.sort_key(),
        }
    }
}
