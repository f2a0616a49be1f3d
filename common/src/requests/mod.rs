use crate::model::compliance::ComplianceFlag;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Opens the compliance gate for a catalogued source.
#[derive(Deserialize, Serialize)]
pub struct BeginApprovalRequest {
    pub target_id: String,
}

/// Flips one compliance checkbox of the open gate.
#[derive(Deserialize, Serialize)]
pub struct ToggleComplianceRequest {
    pub flag: ComplianceFlag,
}

/// Rows fetched from a source plus the operator's per-row selection.
/// Rows are matched to the selection map by their `id` field.
#[derive(Deserialize, Serialize, Default)]
pub struct CommitFederationRequest {
    pub records: Vec<Value>,
    #[serde(default)]
    pub selected: HashMap<String, bool>,
}

/// Records returned by a registration preview fetch.
#[derive(Deserialize, Serialize)]
pub struct PreviewResponse {
    pub records: Vec<Value>,
}
