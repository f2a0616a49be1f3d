//! # Compliance Service Module
//!
//! The acknowledgment step that gates polling, under `/api/compliance`.
//!
//! *   **`POST /begin`**: opens a gate for `{ "target_id" }` with all flags cleared.
//! *   **`POST /toggle`**: flips `{ "flag" }` (`terms`, `data_protection`,
//!     `purpose_limitation`) and returns the current flags.
//! *   **`POST /cancel`**: discards the open gate.
//! *   **`POST /submit`**: approves when every flag is set and starts polling the
//!     target; otherwise answers `400` and keeps the gate open.

mod begin;
mod cancel;
mod submit;
mod toggle;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/compliance";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/begin", post().to(begin::process))
        .route("/toggle", post().to(toggle::process))
        .route("/cancel", post().to(cancel::process))
        .route("/submit", post().to(submit::process))
}
