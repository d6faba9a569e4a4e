//! Bulk catalog import endpoint

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppResult, ErrorResponse},
    models::import::{ImportReport, ImportRequest},
};

use super::{paths, ImportNotice, JsonBody, Notice};

/// Import authors, books and copies in one transaction.
///
/// Rows reference each other through their source ids. Books whose author is
/// missing, and copies whose book is missing, are skipped and counted.
#[utoipa::path(
    post,
    path = "/import",
    tag = "import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Import completed", body = ImportNotice),
        (status = 422, description = "Invalid rows", body = ErrorResponse)
    )
)]
pub async fn import_catalog(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): JsonBody<ImportRequest>,
) -> AppResult<Json<Notice<ImportReport>>> {
    let report = state.services.import.import(request).await?;
    Ok(Json(Notice::new(
        format!(
            "Imported {} authors, {} books and {} copies.",
            report.authors, report.books, report.copies
        ),
        paths::BOOKS,
        report,
    )))
}
