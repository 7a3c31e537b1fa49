use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A member of staff who can submit checklists.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub employee_number: Option<String>,
    pub company_id: Option<String>,
}

/// Request body for creating a staff member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewStaff {
    pub name: String,
    #[serde(default)]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}
