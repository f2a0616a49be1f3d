use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub(crate) async fn process(
    core: web::Data<FederationCore>,
    target_id: web::Path<String>,
) -> impl Responder {
    match core.toggle_polling(&target_id) {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => e.error_response(),
    }
}
