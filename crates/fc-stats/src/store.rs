//! The narrow view of the record store that the stats engine needs.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use fc_core::entities::{ChecklistRecord, RepairStatusEntry};
use fc_db::error::DatabaseError;
use fc_db::repos::ChecklistFilter;
use fc_db::service::FleetService;

/// Read-only checklist and ledger queries.
///
/// `find` is always bounded. `lookup` returns only identities that have a
/// ledger entry; a store failure is an error, never an empty map.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn count(&self, filter: &ChecklistFilter) -> Result<u64, DatabaseError>;

    async fn find(
        &self,
        filter: &ChecklistFilter,
        limit: u32,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError>;

    async fn lookup(
        &self,
        repair_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, RepairStatusEntry>, DatabaseError>;
}

#[async_trait]
impl RecordStore for FleetService {
    async fn count(&self, filter: &ChecklistFilter) -> Result<u64, DatabaseError> {
        self.count_checklists(filter).await
    }

    async fn find(
        &self,
        filter: &ChecklistFilter,
        limit: u32,
    ) -> Result<Vec<ChecklistRecord>, DatabaseError> {
        self.find_checklists(filter, limit).await
    }

    async fn lookup(
        &self,
        repair_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, RepairStatusEntry>, DatabaseError> {
        self.lookup_repair_status(repair_ids).await
    }
}
