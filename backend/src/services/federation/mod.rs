mod commit;

use actix_web::web;

const API_PATH: &str = "/api/federation";

/// Configures and returns the Actix `Scope` for bulk federation of selected rows.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).route("/commit", web::post().to(commit::process))
}
