use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::connection::SourceDraft;

pub(crate) async fn process(
    core: web::Data<FederationCore>,
    payload: web::Json<SourceDraft>,
) -> impl Responder {
    match core.register_source(payload.into_inner()).await {
        Ok(descriptor) => HttpResponse::Created().json(descriptor),
        Err(e) => e.error_response(),
    }
}
