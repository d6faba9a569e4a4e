//! Author endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::author::{Author, AuthorDetails, AuthorInput, AuthorSummary},
};

use super::{paths, AuthorNotice, Created, EmptyNotice, Gone, JsonBody, Notice};

/// List authors by last name, then first name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorSummary>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AuthorSummary>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Get an author with its books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetails),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.authors.get_details(id).await?;
    Ok(Json(author))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/authors/new",
    tag = "authors",
    responses(
        (status = 200, description = "Author form draft", body = AuthorInput)
    )
)]
pub async fn new_author_form() -> Json<AuthorInput> {
    Json(AuthorInput::default())
}

/// Author form pre-filled with the current values
#[utoipa::path(
    get,
    path = "/authors/{id}/edit",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author form draft", body = AuthorInput),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn edit_author_form(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorInput>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(AuthorInput::from(&author)))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = AuthorNotice),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<AuthorInput>,
) -> AppResult<Created<Author>> {
    let author = state.services.authors.create(&data).await?;
    Ok(Created(Notice::new(
        "Author created.",
        paths::author(author.id),
        author,
    )))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = AuthorNotice),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    WithRejection(Json(data), _): JsonBody<AuthorInput>,
) -> AppResult<Json<Notice<Author>>> {
    let author = state.services.authors.update(id, &data).await?;
    Ok(Json(Notice::new(
        "Author updated.",
        paths::author(author.id),
        author,
    )))
}

/// Delete an author together with its books and their copies
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = EmptyNotice),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notice<Gone>>> {
    state.services.authors.delete(id).await?;
    Ok(Json(Notice::new("Author deleted.", paths::AUTHORS, Gone { id })))
}
