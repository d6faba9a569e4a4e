//! Integration tests.
//!
//! `api_tests` runs the router in-process and never reaches the database.
//! `catalog_tests` needs PostgreSQL: run with `cargo test -- --ignored` and `DATABASE_URL` set.

mod catalog_tests;
mod common;
