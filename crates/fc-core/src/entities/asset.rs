use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A machine in the fleet.
///
/// `check_type` names the checklist template that applies to the machine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    pub make: String,
    pub model: String,
    pub check_type: Option<String>,
    pub company_id: Option<String>,
}

/// Request body for creating an asset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewAsset {
    pub make: String,
    /// Older exports call this column `name`.
    #[serde(alias = "name")]
    pub model: String,
    #[serde(default)]
    pub check_type: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}
