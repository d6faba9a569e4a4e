//! Copy endpoints, including loan and return

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::copy::{
        Copy, CopyDetails, CopyForm, CopyInput, CopyQuery, CopyView, LoanRequest, NewCopyQuery,
    },
};

use super::{paths, CopyNotice, CopyViewNotice, Created, EmptyNotice, Gone, JsonBody, Notice};

/// List copies, optionally only available or only loaned ones
#[utoipa::path(
    get,
    path = "/copies",
    tag = "copies",
    params(CopyQuery),
    responses(
        (status = 200, description = "Copies with book and author", body = Vec<CopyDetails>)
    )
)]
pub async fn list_copies(
    State(state): State<crate::AppState>,
    Query(query): Query<CopyQuery>,
) -> AppResult<Json<Vec<CopyDetails>>> {
    let copies = state.services.copies.list(query.status.as_deref()).await?;
    Ok(Json(copies))
}

/// Get a copy with its book and author
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = CopyDetails),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CopyDetails>> {
    let copy = state.services.copies.get_details(id).await?;
    Ok(Json(copy))
}

/// Empty copy form, optionally pre-filled with a book
#[utoipa::path(
    get,
    path = "/copies/new",
    tag = "copies",
    params(NewCopyQuery),
    responses(
        (status = 200, description = "Copy form draft", body = CopyForm)
    )
)]
pub async fn new_copy_form(
    State(state): State<crate::AppState>,
    Query(query): Query<NewCopyQuery>,
) -> AppResult<Json<CopyForm>> {
    let form = state.services.copies.form(None, query.book_id).await?;
    Ok(Json(form))
}

/// Copy form pre-filled with the current values
#[utoipa::path(
    get,
    path = "/copies/{id}/edit",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy form draft", body = CopyForm),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn edit_copy_form(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CopyForm>> {
    let form = state.services.copies.form(Some(id), None).await?;
    Ok(Json(form))
}

/// Add a copy to a book
#[utoipa::path(
    post,
    path = "/copies",
    tag = "copies",
    request_body = CopyInput,
    responses(
        (status = 201, description = "Copy created", body = CopyNotice),
        (status = 422, description = "Unknown book", body = ErrorResponse)
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): JsonBody<CopyInput>,
) -> AppResult<Created<Copy>> {
    let copy = state.services.copies.create(&data).await?;
    Ok(Created(Notice::new(
        "Copy added.",
        paths::book(copy.book_id),
        copy,
    )))
}

/// Edit a copy's fields directly
#[utoipa::path(
    put,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    request_body = CopyInput,
    responses(
        (status = 200, description = "Copy updated", body = CopyNotice),
        (status = 404, description = "Copy not found", body = ErrorResponse),
        (status = 422, description = "Unknown book", body = ErrorResponse)
    )
)]
pub async fn update_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    WithRejection(Json(data), _): JsonBody<CopyInput>,
) -> AppResult<Json<Notice<Copy>>> {
    let copy = state.services.copies.update(id, &data).await?;
    Ok(Json(Notice::new(
        "Copy updated.",
        paths::book(copy.book_id),
        copy,
    )))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy deleted", body = EmptyNotice),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn delete_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notice<Gone>>> {
    let book_id = state.services.copies.delete(id).await?;
    Ok(Json(Notice::new("Copy deleted.", paths::book(book_id), Gone { id })))
}

/// Loan a copy. The loan date is the server's current date.
#[utoipa::path(
    patch,
    path = "/copies/{id}/loan",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Copy loaned", body = CopyViewNotice),
        (status = 404, description = "Copy not found", body = ErrorResponse),
        (status = 409, description = "Copy already loaned (strict loans only)", body = ErrorResponse),
        (status = 422, description = "Missing borrower name", body = ErrorResponse)
    )
)]
pub async fn loan_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    request: Option<Json<LoanRequest>>,
) -> AppResult<Json<Notice<CopyView>>> {
    // A missing or unreadable body is a loan without borrower
    let borrower = request.and_then(|Json(request)| request.borrower);
    let copy = state
        .services
        .copies
        .loan(id, borrower.as_deref())
        .await?;

    let borrower = copy.copy.borrower.clone().unwrap_or_default();
    Ok(Json(Notice::new(
        format!("Copy loaned to {}.", borrower),
        paths::book(copy.copy.book_id),
        copy,
    )))
}

/// Return a copy
#[utoipa::path(
    patch,
    path = "/copies/{id}/return",
    tag = "copies",
    params(("id" = i64, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy returned", body = CopyViewNotice),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Notice<CopyView>>> {
    let copy = state.services.copies.return_copy(id).await?;
    Ok(Json(Notice::new(
        "Copy returned.",
        paths::book(copy.copy.book_id),
        copy,
    )))
}
