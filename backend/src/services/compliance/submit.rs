use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};

/// Handler for `POST /api/compliance/submit`.
///
/// Answers with the session state after the first fetch of the newly started
/// poll, which is `Error` when that fetch already failed.
pub(crate) async fn process(core: web::Data<FederationCore>) -> impl Responder {
    match core.approve_and_start().await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => e.error_response(),
    }
}
