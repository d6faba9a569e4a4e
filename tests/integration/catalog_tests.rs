//! Database-backed catalog tests

use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;

use shelfmark_server::config::CatalogConfig;

use crate::common::{call, get, post, router, today};

fn app(pool: PgPool) -> Router {
    router(pool, CatalogConfig::default())
}

async fn create_author(app: &Router, first_name: &str, last_name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/authors",
        json!({ "first_name": first_name, "last_name": last_name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_book(app: &Router, title: &str, author_id: i64) -> i64 {
    let (status, body) = post(app, "/books", json!({ "title": title, "author_id": author_id })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

async fn add_copy(app: &Router, book_id: i64) -> i64 {
    let (status, body) = post(app, "/copies", json!({ "book_id": book_id })).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"]["id"].as_i64().unwrap()
}

async fn first_copy(app: &Router, book_id: i64) -> Value {
    let (_, body) = get(app, &format!("/books/{}", book_id)).await;
    body["copies"][0].clone()
}

fn titles(list: &Value) -> Vec<String> {
    list["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

/// Herbert (Dune, 3 copies), Le Guin (Earthsea, 1 copy), Asimov (Foundation, 2 copies)
async fn seed(app: &Router) {
    let herbert = create_author(app, "Frank", "Herbert").await;
    let le_guin = create_author(app, "Ursula K.", "Le Guin").await;
    let asimov = create_author(app, "Isaac", "Asimov").await;

    let dune = create_book(app, "Dune", herbert).await;
    add_copy(app, dune).await;
    add_copy(app, dune).await;
    create_book(app, "A Wizard of Earthsea", le_guin).await;
    let foundation = create_book(app, "Foundation", asimov).await;
    add_copy(app, foundation).await;
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_new_book_gets_one_available_copy(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;

    let (status, body) = post(&app, "/books", json!({ "title": "Dune", "author_id": author })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book created. One copy was added automatically.");

    let book_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["location"], format!("/books/{}", book_id));

    let (_, details) = get(&app, &format!("/books/{}", book_id)).await;
    let copies = details["copies"].as_array().unwrap();
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0]["is_loaned"], false);
    assert_eq!(details["author"]["full_name"], "Frank Herbert");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_with_unknown_author_is_rejected(pool: PgPool) {
    let app = app(pool);

    let (status, body) = post(&app, "/books", json!({ "title": "Dune", "author_id": 999 })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["author_id"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_default_listing_order(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;

    let (status, list) = get(&app, "/books").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 3);
    assert!(list["sort"].is_null());
    assert_eq!(
        titles(&list),
        vec!["Foundation", "Dune", "A Wizard of Earthsea"]
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_search_is_case_insensitive(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;

    let (_, by_title) = get(&app, "/books?search=DUNE").await;
    assert_eq!(titles(&by_title), vec!["Dune"]);

    let (_, by_last_name) = get(&app, "/books?search=guin").await;
    assert_eq!(titles(&by_last_name), vec!["A Wizard of Earthsea"]);

    let (_, by_first_name) = get(&app, "/books?search=isaac").await;
    assert_eq!(titles(&by_first_name), vec!["Foundation"]);

    let (_, blank) = get(&app, "/books?search=%20%20").await;
    assert_eq!(blank["total"], 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "", "Smith").await;
    create_book(&app, "100% Cotton", author).await;
    create_book(&app, "1000 Cotton Mills", author).await;

    let (_, list) = get(&app, "/books?search=100%25").await;

    assert_eq!(titles(&list), vec!["100% Cotton"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_sort_by_copy_count_reverses(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;

    let (_, asc) = get(&app, "/books?sort=copyCount&direction=asc").await;
    let (_, desc) = get(&app, "/books?sort=copyCount&direction=desc").await;

    assert_eq!(asc["sort"], "copyCount");
    assert_eq!(titles(&asc), vec!["A Wizard of Earthsea", "Foundation", "Dune"]);
    assert_eq!(titles(&desc), vec!["Dune", "Foundation", "A Wizard of Earthsea"]);
    assert_eq!(desc["books"][0]["copy_count"], 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_unknown_sort_uses_default_order(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;

    let (_, list) = get(&app, "/books?sort=isbn&direction=desc").await;

    assert!(list["sort"].is_null());
    assert_eq!(
        titles(&list),
        vec!["Foundation", "Dune", "A Wizard of Earthsea"]
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_loan_then_return(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy_id = first_copy(&app, book).await["id"].as_i64().unwrap();

    let (status, loaned) = call(
        &app,
        Method::PATCH,
        &format!("/copies/{}/loan", copy_id),
        Some(json!({ "borrower": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaned["message"], "Copy loaned to Ana.");
    assert_eq!(loaned["location"], format!("/books/{}", book));
    assert_eq!(loaned["data"]["is_loaned"], true);
    assert_eq!(loaned["data"]["borrower"], "Ana");
    assert_eq!(loaned["data"]["loan_date"], today().to_string());

    let (status, returned) =
        call(&app, Method::PATCH, &format!("/copies/{}/return", copy_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["data"]["is_loaned"], false);
    assert!(returned["data"]["borrower"].is_null());
    assert!(returned["data"]["loan_date"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_empty_loan_leaves_copy_unchanged(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy = first_copy(&app, book).await;
    let copy_id = copy["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/copies/{}/loan", copy_id),
        Some(json!({ "borrower": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, after) = get(&app, &format!("/copies/{}", copy_id)).await;
    assert_eq!(after["is_loaned"], false);
    assert_eq!(after["updated_at"], copy["updated_at"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_reloan_overwrites_by_default(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy_id = first_copy(&app, book).await["id"].as_i64().unwrap();
    let path = format!("/copies/{}/loan", copy_id);

    call(&app, Method::PATCH, &path, Some(json!({ "borrower": "Ana" }))).await;
    let (status, body) = call(&app, Method::PATCH, &path, Some(json!({ "borrower": "Luis" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["borrower"], "Luis");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_strict_loans_refuse_reloan(pool: PgPool) {
    let app = router(
        pool,
        CatalogConfig {
            strict_loans: true,
            ..CatalogConfig::default()
        },
    );
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy_id = first_copy(&app, book).await["id"].as_i64().unwrap();
    let path = format!("/copies/{}/loan", copy_id);

    call(&app, Method::PATCH, &path, Some(json!({ "borrower": "Ana" }))).await;
    let (status, _) = call(&app, Method::PATCH, &path, Some(json!({ "borrower": "Luis" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, copy) = get(&app, &format!("/copies/{}", copy_id)).await;
    assert_eq!(copy["borrower"], "Ana");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_missing_copy_is_not_found(pool: PgPool) {
    let app = app(pool);

    let (loan, _) = call(
        &app,
        Method::PATCH,
        "/copies/999/loan",
        Some(json!({ "borrower": "Ana" })),
    )
    .await;
    let (give_back, _) = call(&app, Method::PATCH, "/copies/999/return", None).await;

    assert_eq!(loan, StatusCode::NOT_FOUND);
    assert_eq!(give_back, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_author_cascades(pool: PgPool) {
    let app = app(pool.clone());
    let author = create_author(&app, "Frank", "Herbert").await;
    for title in ["Dune", "Dune Messiah"] {
        let book = create_book(&app, title, author).await;
        add_copy(&app, book).await;
        add_copy(&app, book).await;
    }
    let other = create_author(&app, "Isaac", "Asimov").await;
    create_book(&app, "Foundation", other).await;

    let (status, body) = call(&app, Method::DELETE, &format!("/authors/{}", author), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "/authors");

    let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(&pool)
        .await
        .unwrap();
    let copies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(books, 1);
    assert_eq!(copies, 1);

    let (status, _) = get(&app, &format!("/authors/{}", author)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_delete_copy_points_back_to_book(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy_id = add_copy(&app, book).await;

    let (status, body) = call(&app, Method::DELETE, &format!("/copies/{}", copy_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], format!("/books/{}", book));
    assert_eq!(first_copy(&app, book).await["is_loaned"], false);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_copy_status_filter(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;
    let (_, copies) = get(&app, "/copies").await;
    let copy_id = copies[0]["id"].as_i64().unwrap();
    call(
        &app,
        Method::PATCH,
        &format!("/copies/{}/loan", copy_id),
        Some(json!({ "borrower": "Ana" })),
    )
    .await;

    let (_, loaned) = get(&app, "/copies?status=loaned").await;
    let (_, available) = get(&app, "/copies?status=available").await;
    let (_, everything) = get(&app, "/copies?status=lost").await;

    assert_eq!(loaned.as_array().unwrap().len(), 1);
    assert_eq!(available.as_array().unwrap().len(), 5);
    assert_eq!(everything.as_array().unwrap().len(), 6);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_dashboard_totals(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;
    let (_, copies) = get(&app, "/copies").await;
    for copy in copies.as_array().unwrap().iter().take(2) {
        call(
            &app,
            Method::PATCH,
            &format!("/copies/{}/loan", copy["id"]),
            Some(json!({ "borrower": "Ana" })),
        )
        .await;
    }

    let (status, summary) = get(&app, "/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_books"], 3);
    assert_eq!(summary["total_authors"], 3);
    assert_eq!(summary["copies"]["total"], 6);
    assert_eq!(summary["copies"]["loaned"], 2);
    assert_eq!(summary["copies"]["available"], 4);
    assert_eq!(summary["recent_books"][0]["title"], "Foundation");
    assert_eq!(summary["recent_loans"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_import_remaps_ids_and_skips_orphans(pool: PgPool) {
    let app = app(pool);

    let (status, body) = post(
        &app,
        "/import",
        json!({
            "authors": [
                { "id": 10, "first_name": "Frank", "last_name": "Herbert" }
            ],
            "books": [
                { "id": 1, "title": "Dune", "author": 10 },
                { "id": 2, "title": "Orphan", "author": 99 }
            ],
            "copies": [
                { "book": 1, "borrower": "Ana", "loan_date": "2025-12-01" },
                { "book": 1 },
                { "book": 2 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["authors"], 1);
    assert_eq!(body["data"]["books"], 1);
    assert_eq!(body["data"]["copies"], 2);
    assert_eq!(body["data"]["skipped_books"], 1);
    assert_eq!(body["data"]["skipped_copies"], 1);

    let (_, list) = get(&app, "/books").await;
    assert_eq!(titles(&list), vec!["Dune"]);
    assert_eq!(list["books"][0]["copy_count"], 2);
    assert_eq!(list["books"][0]["loaned_count"], 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_author_without_first_name_sorts_first(pool: PgPool) {
    let app = app(pool);
    let john = create_author(&app, "John", "Smith").await;
    let smith = create_author(&app, "", "Smith").await;
    create_book(&app, "B by John", john).await;
    create_book(&app, "A by Smith only", smith).await;

    let (_, list) = get(&app, "/books").await;
    assert_eq!(titles(&list), vec!["A by Smith only", "B by John"]);

    let (_, by_author) = get(&app, "/books?sort=author&direction=desc").await;
    assert_eq!(titles(&by_author), vec!["B by John", "A by Smith only"]);

    let (_, authors) = get(&app, "/authors").await;
    let keys: Vec<&str> = authors
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["sort_key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["Smith", "Smith John"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_without_copies_is_listed(pool: PgPool) {
    let app = app(pool);
    seed(&app).await;
    let (_, list) = get(&app, "/books?search=earthsea").await;
    let earthsea = list["books"][0]["id"].as_i64().unwrap();
    let copy_id = first_copy(&app, earthsea).await["id"].as_i64().unwrap();
    call(&app, Method::DELETE, &format!("/copies/{}", copy_id), None).await;

    let (_, asc) = get(&app, "/books?sort=copyCount").await;
    let (_, desc) = get(&app, "/books?sort=copyCount&direction=desc").await;

    assert_eq!(asc["total"], 3);
    assert_eq!(titles(&asc), vec!["A Wizard of Earthsea", "Foundation", "Dune"]);
    assert_eq!(asc["books"][0]["copy_count"], 0);
    assert_eq!(asc["books"][0]["loaned_count"], 0);
    assert_eq!(titles(&desc), vec!["Dune", "Foundation", "A Wizard of Earthsea"]);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_returned_copy_leaves_recent_loans(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let copy_id = first_copy(&app, book).await["id"].as_i64().unwrap();

    call(
        &app,
        Method::PATCH,
        &format!("/copies/{}/loan", copy_id),
        Some(json!({ "borrower": "Ana" })),
    )
    .await;
    let (_, loaned) = get(&app, "/dashboard").await;
    assert_eq!(loaned["recent_loans"][0]["copy_id"], copy_id);
    assert_eq!(loaned["recent_loans"][0]["borrower"], "Ana");

    call(&app, Method::PATCH, &format!("/copies/{}/return", copy_id), None).await;
    let (_, returned) = get(&app, "/dashboard").await;

    assert!(returned["recent_loans"].as_array().unwrap().is_empty());
    assert_eq!(returned["copies"]["loaned"], 0);
    assert_eq!(returned["copies"]["available"], 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_recent_loans_newest_first(pool: PgPool) {
    let app = app(pool);
    let author = create_author(&app, "Frank", "Herbert").await;
    let book = create_book(&app, "Dune", author).await;
    let older = first_copy(&app, book).await["id"].as_i64().unwrap();
    let newer = add_copy(&app, book).await;
    let undated = add_copy(&app, book).await;

    // Loan dates set directly so they differ
    let dates = [
        (older, json!("2025-01-10")),
        (newer, json!("2025-06-01")),
        (undated, json!(null)),
    ];
    for (copy, date) in dates {
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/copies/{}", copy),
            Some(json!({ "book_id": book, "borrower": "Ana", "loan_date": date })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    let (_, summary) = get(&app, "/dashboard").await;
    let order: Vec<i64> = summary["recent_loans"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["copy_id"].as_i64().unwrap())
        .collect();

    assert_eq!(order, vec![newer, older, undated]);
}
