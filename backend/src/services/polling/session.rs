use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(core: web::Data<FederationCore>) -> impl Responder {
    HttpResponse::Ok().json(core.session())
}
