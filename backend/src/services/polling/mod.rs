//! # Polling Service Module
//!
//! Observation and control of the live polling session, under `/api/polling`.
//! Polling is started by `/api/compliance/submit`; these routes only read or
//! end the session.

mod collapse;
mod session;
mod stop;
mod toggle;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/polling";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Session state plus readings, most recent first.
        .route("/session", get().to(session::process))
        .route("/stop", post().to(stop::process))
        // Stops the target if it is polling; otherwise 409, approval is required.
        .route("/{target_id}/toggle", post().to(toggle::process))
        // The target's detail view was closed.
        .route("/{target_id}/collapse", post().to(collapse::process))
}
