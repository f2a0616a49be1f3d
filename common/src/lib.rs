//! Types shared between the federation backend and its clients.
//!
//! Everything here is plain data: serialisable descriptors, compliance flags,
//! readings and the request payloads accepted by the HTTP API.

pub mod model;
pub mod requests;
pub mod session;
