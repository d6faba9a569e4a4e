//! Catalog listing service: search and sort over books

use crate::{
    error::AppResult,
    models::book::{BookList, BookQuery, CatalogQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books joined with author and copy counts, filtered and sorted per `query`
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<BookList> {
        let resolved = CatalogQuery::from(query);
        tracing::debug!(
            "Catalog search: term={:?} sort={:?} direction={}",
            resolved.search,
            resolved.sort,
            resolved.direction
        );

        let books = self.repository.books.search(&resolved).await?;

        Ok(BookList {
            total: books.len(),
            books,
            search: resolved.search,
            sort: resolved.sort,
            direction: resolved.direction,
        })
    }
}
