//! Error taxonomy of the federation core.
//!
//! Every failure leaves the core in an inspectable state (`Idle` or `Error`
//! for the polling session, gate still open for compliance), so none of these
//! are fatal. `FederationError` doubles as the HTTP error body through
//! `ResponseError`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::compliance::ComplianceFlag;
use common::model::connection::ConnectionKind;
use serde_json::json;
use thiserror::Error;

/// Failure of a single GET + JSON decode against a source URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The source answered, but not with a 2xx status.
    #[error("source answered with HTTP status {status_code}")]
    Status { status_code: u16 },
    /// The body could not be decoded as JSON.
    #[error("response body is not valid JSON: {detail}")]
    Decode { detail: String },
    /// Timeout, DNS failure, refused connection and the like.
    #[error("network failure: {detail}")]
    Network { detail: String },
}

impl FetchError {
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Status { .. } => "status",
            FetchError::Decode { .. } => "decode",
            FetchError::Network { .. } => "network",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("catalog record is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{option} must be greater than zero")]
    Zero { option: &'static str },
    #[error("cannot build the HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Error)]
pub enum FederationError {
    #[error("required field `{field}` is blank")]
    Validation { field: &'static str },
    #[error("{0} connections are not supported")]
    UnsupportedConnection(ConnectionKind),
    #[error("all compliance items must be accepted, missing: {}", list_flags(.missing))]
    IncompleteCompliance { missing: Vec<ComplianceFlag> },
    #[error("no compliance approval is in progress")]
    NoPendingApproval,
    #[error("source {0} must pass the compliance gate before polling")]
    ApprovalRequired(String),
    #[error("source {0} is not in the catalog")]
    UnknownSource(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn list_flags(flags: &[ComplianceFlag]) -> String {
    flags
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FederationError {
    /// Stable machine-readable identifier, used as the `error` field of HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FederationError::Validation { .. } => "validation",
            FederationError::UnsupportedConnection(_) => "unsupported_connection",
            FederationError::IncompleteCompliance { .. } => "incomplete_compliance",
            FederationError::NoPendingApproval => "no_pending_approval",
            FederationError::ApprovalRequired(_) => "approval_required",
            FederationError::UnknownSource(_) => "unknown_source",
            FederationError::Fetch(_) => "fetch",
            FederationError::Store(_) => "store",
        }
    }
}

impl ResponseError for FederationError {
    fn status_code(&self) -> StatusCode {
        match self {
            FederationError::Validation { .. }
            | FederationError::UnsupportedConnection(_)
            | FederationError::IncompleteCompliance { .. }
            | FederationError::NoPendingApproval => StatusCode::BAD_REQUEST,
            FederationError::ApprovalRequired(_) => StatusCode::CONFLICT,
            FederationError::UnknownSource(_) => StatusCode::NOT_FOUND,
            FederationError::Fetch(_) => StatusCode::BAD_GATEWAY,
            FederationError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "error": self.kind(), "message": self.to_string() });
        if let FederationError::Fetch(fetch) = self {
            body["reason"] = json!(fetch.reason());
        }
        HttpResponse::build(self.status_code()).json(body)
    }
}
