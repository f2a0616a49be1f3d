//! # Catalog Service Module
//!
//! Connection setup and the catalog of registered sources, under `/api/catalog`.
//!
//! ## Sub-modules:
//! - `list`: returns every registered `ConnectionDescriptor`.
//! - `preview`: validates a `SourceDraft` and returns the records of a one-shot fetch,
//!   so the operator can inspect the data before registering.
//! - `register`: validates, fetches and stores the draft as a new descriptor whose
//!   `record_count` is the size of that fetch.

mod list;
mod preview;
mod register;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/catalog";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/preview", post().to(preview::process))
        .route("/register", post().to(register::process))
}
