use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub(crate) async fn process(core: web::Data<FederationCore>) -> impl Responder {
    let cancelled = core.cancel_approval();
    HttpResponse::Ok().json(json!({ "cancelled": cancelled }))
}
