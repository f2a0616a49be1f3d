use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::BeginApprovalRequest;

pub(crate) async fn process(
    core: web::Data<FederationCore>,
    payload: web::Json<BeginApprovalRequest>,
) -> impl Responder {
    match core.begin_approval(&payload.target_id) {
        Ok(flags) => HttpResponse::Ok().json(flags),
        Err(e) => e.error_response(),
    }
}
