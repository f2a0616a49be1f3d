use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The protocol family an operator declares for a federated source.
///
/// Only informational: every source is fetched with a plain HTTP GET, the
/// protocol is stored so the catalog can be filtered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProtocolType {
    #[default]
    #[serde(rename = "REST")]
    Rest,
    #[serde(rename = "GraphQL")]
    GraphQl,
    #[serde(rename = "SOAP")]
    Soap,
    #[serde(rename = "OPC-UA")]
    OpcUa,
    #[serde(rename = "MQTT")]
    Mqtt,
    #[serde(rename = "WebSocket")]
    WebSocket,
    #[serde(rename = "gRPC")]
    Grpc,
    #[serde(rename = "Other")]
    Other,
}

impl ProtocolType {
    pub const ALL: [ProtocolType; 8] = [
        ProtocolType::Rest,
        ProtocolType::GraphQl,
        ProtocolType::Soap,
        ProtocolType::OpcUa,
        ProtocolType::Mqtt,
        ProtocolType::WebSocket,
        ProtocolType::Grpc,
        ProtocolType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolType::Rest => "REST",
            ProtocolType::GraphQl => "GraphQL",
            ProtocolType::Soap => "SOAP",
            ProtocolType::OpcUa => "OPC-UA",
            ProtocolType::Mqtt => "MQTT",
            ProtocolType::WebSocket => "WebSocket",
            ProtocolType::Grpc => "gRPC",
            ProtocolType::Other => "Other",
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the operator connects to the source during setup.
///
/// Database and file connections are listed in the setup flow but are not
/// wired to a fetcher; registering one is rejected before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    #[default]
    RestApi,
    Database,
    File,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionKind::RestApi => "restapi",
            ConnectionKind::Database => "database",
            ConnectionKind::File => "file",
        };
        f.write_str(label)
    }
}

/// Operator-supplied metadata collected by the connection-setup step.
///
/// A draft is not yet part of the catalog: it becomes a
/// [`ConnectionDescriptor`] only after a successful preview fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDraft {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub protocol_type: ProtocolType,
    #[serde(default)]
    pub connection_kind: ConnectionKind,
}

/// A registered federated source, as stored in the catalog.
///
/// Descriptors are never mutated once created, so the fields are only exposed
/// through accessors. `record_count` is the size of the preview fetch taken at
/// registration time and is not refreshed by later polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    id: String,
    name: String,
    description: String,
    protocol_type: ProtocolType,
    url: String,
    connection_kind: ConnectionKind,
    registered_at: DateTime<Utc>,
    record_count: usize,
}

impl ConnectionDescriptor {
    pub fn new(
        id: impl Into<String>,
        draft: SourceDraft,
        record_count: usize,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            description: draft.description,
            protocol_type: draft.protocol_type,
            url: draft.url,
            connection_kind: draft.connection_kind,
            registered_at,
            record_count,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn protocol_type(&self) -> ProtocolType {
        self.protocol_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn connection_kind(&self) -> ConnectionKind {
        self.connection_kind
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}
