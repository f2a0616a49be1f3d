use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::CommitFederationRequest;
use serde_json::json;

/// Handler for `POST /api/federation/commit`.
///
/// Stores the rows whose `id` is ticked in `selected` and answers with the
/// number written. An empty selection writes nothing and answers `0`.
pub(crate) async fn process(
    core: web::Data<FederationCore>,
    payload: web::Json<CommitFederationRequest>,
) -> impl Responder {
    match core.commit_selected(&payload) {
        Ok(committed) => HttpResponse::Ok().json(json!({ "committed": committed })),
        Err(e) => e.error_response(),
    }
}
