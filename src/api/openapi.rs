//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, copies, dashboard, health, import};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfmark API",
        version = "0.3.0",
        description = "Small library catalog: authors, books, physical copies and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Dashboard
        dashboard::get_dashboard,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::new_author_form,
        authors::edit_author_form,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::new_book_form,
        books::edit_book_form,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Copies
        copies::list_copies,
        copies::get_copy,
        copies::new_copy_form,
        copies::edit_copy_form,
        copies::create_copy,
        copies::update_copy,
        copies::delete_copy,
        copies::loan_copy,
        copies::return_copy,
        // Import
        import::import_catalog,
    ),
    components(
        schemas(
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorSummary,
            crate::models::author::AuthorDetails,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorOption,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::BookInput,
            crate::models::book::BookForm,
            crate::models::book::BookOption,
            crate::models::book::BookListing,
            crate::models::book::BookList,
            crate::models::book::SortColumn,
            crate::models::book::SortDirection,
            // Copies
            crate::models::copy::Copy,
            crate::models::copy::CopyView,
            crate::models::copy::CopyDetails,
            crate::models::copy::CopyInput,
            crate::models::copy::CopyForm,
            crate::models::copy::CopyStatus,
            crate::models::copy::LoanState,
            crate::models::copy::LoanRequest,
            // Dashboard
            crate::models::dashboard::DashboardSummary,
            crate::models::dashboard::CopyTotals,
            crate::models::dashboard::RecentBook,
            crate::models::dashboard::RecentLoan,
            // Import
            crate::models::import::ImportRequest,
            crate::models::import::ImportAuthor,
            crate::models::import::ImportBook,
            crate::models::import::ImportCopy,
            crate::models::import::ImportReport,
            // Notices
            super::AuthorNotice,
            super::BookNotice,
            super::CopyNotice,
            super::CopyViewNotice,
            super::ImportNotice,
            super::EmptyNotice,
            super::Gone,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldErrors,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Catalog summary"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book catalog, search and sort"),
        (name = "copies", description = "Physical copies, loans and returns"),
        (name = "import", description = "Bulk catalog import")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
