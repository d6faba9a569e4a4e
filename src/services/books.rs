//! Book management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        author::AuthorOption,
        book::{Book, BookDetails, BookForm, BookInput, DefaultCopy},
        copy::CopyView,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book with its author and copies
    pub async fn get_details(&self, id: i64) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = self.repository.authors.get_by_id(book.author_id).await?;
        let copies = self.repository.copies.list_by_book(id).await?;
        Ok(BookDetails {
            book,
            author: author.into(),
            copies: copies.into_iter().map(CopyView::from).collect(),
        })
    }

    /// Create a book and its first copy
    pub async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let (title, author_id) = self.checked(data).await?;
        let book = self
            .repository
            .books
            .create(&title, author_id, DefaultCopy::Provision)
            .await?;
        tracing::info!("Created book id={} '{}' with one copy", book.id, book.title);
        Ok(book)
    }

    pub async fn update(&self, id: i64, data: &BookInput) -> AppResult<Book> {
        let (title, author_id) = self.checked(data).await?;
        let book = self.repository.books.update(id, &title, author_id).await?;
        tracing::info!("Updated book id={}", book.id);
        Ok(book)
    }

    /// Delete a book with its copies
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={} (copies cascaded)", id);
        Ok(())
    }

    /// Form draft: empty for a new book, pre-filled when `id` is given
    pub async fn form(&self, id: Option<i64>) -> AppResult<BookForm> {
        let values = match id {
            Some(id) => BookInput::from(&self.repository.books.get_by_id(id).await?),
            None => BookInput::default(),
        };
        let authors = self.repository.authors.list().await?;
        Ok(BookForm {
            values,
            authors: authors.iter().map(AuthorOption::from).collect(),
        })
    }

    /// Validated title and author id; every offending field is reported at once
    async fn checked(&self, data: &BookInput) -> AppResult<(String, i64)> {
        let mut errors = data.validate().err().map(FieldErrors::from).unwrap_or_default();
        let data = data.normalized();

        match data.author_id {
            None => errors.add("author_id", "An author must be selected"),
            Some(id) => {
                if !self.repository.authors.exists(id).await? {
                    tracing::warn!("Rejected book for unknown author id={}", id);
                    errors.add("author_id", format!("Author {} does not exist", id));
                }
            }
        }

        match data.author_id {
            Some(author_id) if errors.is_empty() => Ok((data.title, author_id)),
            _ => Err(AppError::Validation(errors)),
        }
    }
}
