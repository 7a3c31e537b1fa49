//! Reference-data seeding from a JSON file.

use serde::Deserialize;

use fc_core::entities::{NewAsset, NewStaff};

use crate::error::DatabaseError;
use crate::service::FleetService;

/// Contents of a seed file: `{"staff": [...], "assets": [...]}`.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub staff: Vec<NewStaff>,
    #[serde(default)]
    pub assets: Vec<NewAsset>,
}

/// Rows inserted by a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub staff: usize,
    pub assets: usize,
}

impl FleetService {
    /// Insert seed rows into each table that is still empty.
    ///
    /// A table that already holds rows is skipped whole, so re-running a seed
    /// never duplicates reference data.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a count or insert fails.
    pub async fn seed_if_empty(&self, seed: SeedFile) -> Result<SeedReport, DatabaseError> {
        let mut report = SeedReport::default();

        if self.count_staff().await? == 0 {
            for staff in seed.staff {
                self.create_staff(staff).await?;
                report.staff += 1;
            }
        } else {
            tracing::debug!("staff table not empty, skipping staff seed");
        }

        if self.count_assets().await? == 0 {
            for asset in seed.assets {
                self.create_asset(asset).await?;
                report.assets += 1;
            }
        } else {
            tracing::debug!("assets table not empty, skipping asset seed");
        }

        tracing::info!(staff = report.staff, assets = report.assets, "seed applied");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    fn seed() -> SeedFile {
        serde_json::from_str(
            r#"{
                "staff": [{"name": "Alan Day", "employee_number": "E1"}],
                "assets": [
                    {"make": "JCB", "name": "3CX", "check_type": "daily_check"},
                    {"make": "Cat", "model": "140M"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn seeds_empty_tables() {
        let svc = test_service().await;
        let report = svc.seed_if_empty(seed()).await.unwrap();
        assert_eq!(report, SeedReport { staff: 1, assets: 2 });
        assert_eq!(svc.list_models("JCB").await.unwrap(), vec!["3CX"]);
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let svc = test_service().await;
        svc.seed_if_empty(seed()).await.unwrap();
        let report = svc.seed_if_empty(seed()).await.unwrap();
        assert_eq!(report, SeedReport::default());
        assert_eq!(svc.count_staff().await.unwrap(), 1);
    }
}
