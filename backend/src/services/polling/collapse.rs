use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(
    core: web::Data<FederationCore>,
    target_id: web::Path<String>,
) -> impl Responder {
    HttpResponse::Ok().json(core.collapse_view(&target_id))
}
