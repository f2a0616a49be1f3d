use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::ToggleComplianceRequest;

pub(crate) async fn process(
    core: web::Data<FederationCore>,
    payload: web::Json<ToggleComplianceRequest>,
) -> impl Responder {
    match core.toggle_compliance(payload.flag) {
        Ok(flags) => HttpResponse::Ok().json(flags),
        Err(e) => e.error_response(),
    }
}
