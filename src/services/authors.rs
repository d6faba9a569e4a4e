//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorDetails, AuthorInput, AuthorSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<AuthorSummary>> {
        let authors = self.repository.authors.list().await?;
        Ok(authors.into_iter().map(AuthorSummary::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Author with its books, by title
    pub async fn get_details(&self, id: i64) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetails {
            author: author.into(),
            books,
        })
    }

    pub async fn create(&self, data: &AuthorInput) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(&data.normalized()).await?;
        tracing::info!("Created author id={} ({})", author.id, author.full_name());
        Ok(author)
    }

    pub async fn update(&self, id: i64, data: &AuthorInput) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.update(id, &data.normalized()).await?;
        tracing::info!("Updated author id={}", author.id);
        Ok(author)
    }

    /// Delete an author with all of its books and copies
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author id={} (books and copies cascaded)", id);
        Ok(())
    }
}
