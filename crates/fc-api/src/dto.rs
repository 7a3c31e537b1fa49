//! Request and response bodies that exist only at the HTTP boundary.
//!
//! Entity and snapshot types come from `fc_core` unchanged.

use serde::{Deserialize, Serialize};

/// `?company_id=` on tenant-scoped reads.
#[derive(Debug, Default, Deserialize)]
pub struct TenantQuery {
    pub company_id: Option<String>,
}

impl TenantQuery {
    /// Blank values mean "all tenants".
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.company_id.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// `?limit=&skip=&company_id=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
    #[serde(default)]
    pub skip: u32,
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckTypeResponse {
    pub make: String,
    pub model: String,
    pub check_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateResponse {
    /// The tenant whose snapshot was dropped, or `None` for all of them.
    pub company_id: Option<String>,
    pub invalidated: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairActionRequest {
    pub repair_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddNoteRequest {
    pub repair_id: String,
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}
