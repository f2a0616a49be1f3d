use crate::federation::FederationCore;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::connection::SourceDraft;
use common::requests::PreviewResponse;

/// Handler for `POST /api/catalog/preview`.
///
/// Nothing is stored; a blank field answers `400` without contacting the
/// source and a failed fetch answers `502`.
pub(crate) async fn process(
    core: web::Data<FederationCore>,
    payload: web::Json<SourceDraft>,
) -> impl Responder {
    match core.preview_source(payload.into_inner()).await {
        Ok(preview) => HttpResponse::Ok().json(PreviewResponse {
            records: preview.into_records(),
        }),
        Err(e) => e.error_response(),
    }
}
