use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub(crate) async fn process(core: web::Data<FederationCore>) -> impl Responder {
    match core.list_sources() {
        Ok(sources) => HttpResponse::Ok().json(sources),
        Err(e) => e.error_response(),
    }
}
