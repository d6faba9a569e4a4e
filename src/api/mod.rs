//! API handlers for Shelfmark REST endpoints

pub mod authors;
pub mod books;
pub mod copies;
pub mod dashboard;
pub mod health;
pub mod import;
pub mod openapi;

use axum::{
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{
    models::{
        author::Author,
        book::Book,
        copy::{Copy, CopyView},
        import::ImportReport,
    },
    error::AppError,
    AppState,
};

/// JSON request body whose rejections are reported as field validation errors
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

/// Outcome of a mutation: a user-facing message, the canonical resource to
/// show next and the affected record.
#[derive(Serialize, ToSchema)]
#[aliases(
    AuthorNotice = Notice<Author>,
    BookNotice = Notice<Book>,
    CopyNotice = Notice<Copy>,
    CopyViewNotice = Notice<CopyView>,
    ImportNotice = Notice<ImportReport>,
    EmptyNotice = Notice<Gone>
)]
pub struct Notice<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub message: String,
    /// Path of the resource to display next
    pub location: String,
    pub data: T,
}

/// Placeholder payload for deletions
#[derive(Serialize, ToSchema)]
pub struct Gone {
    pub id: i64,
}

impl<T> Notice<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(message: impl Into<String>, location: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            location: location.into(),
            data,
        }
    }
}

/// 201 Created with a `Location` header set to the notice location
pub struct Created<T: for<'a> ToSchema<'a>>(pub Notice<T>);

impl<T> IntoResponse for Created<T>
where
    T: for<'a> ToSchema<'a> + Serialize,
{
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.0)).into_response();
        if let Ok(location) = HeaderValue::from_str(&self.0.location) {
            response.headers_mut().insert(LOCATION, location);
        }
        response
    }
}

/// Canonical resource paths, relative to the API root
pub mod paths {
    pub const AUTHORS: &str = "/authors";
    pub const BOOKS: &str = "/books";

    pub fn author(id: i64) -> String {
        format!("{}/{}", AUTHORS, id)
    }

    pub fn book(id: i64) -> String {
        format!("{}/{}", BOOKS, id)
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Dashboard
        .route("/dashboard", get(dashboard::get_dashboard))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route("/authors/new", get(authors::new_author_form))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/authors/:id/edit", get(authors::edit_author_form))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/new", get(books::new_book_form))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/edit", get(books::edit_book_form))
        // Copies
        .route("/copies", get(copies::list_copies).post(copies::create_copy))
        .route("/copies/new", get(copies::new_copy_form))
        .route(
            "/copies/:id",
            get(copies::get_copy)
                .put(copies::update_copy)
                .delete(copies::delete_copy),
        )
        .route("/copies/:id/edit", get(copies::edit_copy_form))
        .route(
            "/copies/:id/loan",
            post(copies::loan_copy).patch(copies::loan_copy),
        )
        .route(
            "/copies/:id/return",
            post(copies::return_copy).patch(copies::return_copy),
        )
        // Bulk import
        .route("/import", post(import::import_catalog))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
