//! HTTP surface of the federation core. Each sub-module owns one `/api/...`
//! scope and delegates to the shared `FederationCore` held as `web::Data`.

pub mod catalog;
pub mod compliance;
pub mod federation;
pub mod polling;
