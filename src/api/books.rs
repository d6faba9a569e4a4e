//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookDetails, BookForm, BookInput, BookList, BookQuery},
};

use super::{paths, BookNotice, Created, EmptyNotice, Gone, JsonBody, Notice};

/// Catalog listing with search and sort
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books with author and copy counts", body = BookList)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookList>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get a book with its author and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.books.get_details(id).await?;
    Ok(Json(book))
}

/// Empty book form with the author choices
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "Book form draft", body = BookForm)
    )
)]
pub async fn new_book_form(State(state): State<crate::AppState>) -> AppResult<Json<BookForm>> {
    let form = state.services.books.form(None).await?;
    Ok(Json(form))
}

/// Book form pre-filled with the current values
#[utoipa::path(
    get,
    path = "/books/{id}/edit",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book form draft", body = BookForm),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn edit_book_form(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookForm>> {
    let form = state.services.books.form(Some(id)).await?;
    Ok(Json(form))
}

/// Create a book. One available copy is added automatically.
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookNotice),
        (status = 422, description = "Invalid input or unknown author", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<BookInput>,
) -> AppResult<Created<Book>> {
    let book = state.services.books.create(&data).await?;
    Ok(Created(Notice::new(
        "Book created. One copy was added automatically.",
        paths::book(book.id),
        book,
    )))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = BookNotice),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 422, description = "Invalid input or unknown author", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    WithRejection(Json(data), _): JsonBody<BookInput>,
) -> AppResult<Json<Notice<Book>>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(Notice::new("Book updated.", paths::book(book.id), book)))
}

/// Delete a book and its copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = EmptyNotice),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notice<Gone>>> {
    state.services.books.delete(id).await?;
    Ok(Json(Notice::new("Book deleted.", paths::BOOKS, Gone { id })))
}
