//! Asset repository: the fleet register and the make/model pickers built on it.

use fc_core::entities::{Asset, NewAsset};
use fc_core::ids::PREFIX_ASSET;

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::FleetService;

fn row_to_asset(row: &libsql::Row) -> Result<Asset, DatabaseError> {
    Ok(Asset {
        id: row.get(0)?,
        make: row.get(1)?,
        model: row.get(2)?,
        check_type: get_opt_string(row, 3)?,
        company_id: get_opt_string(row, 4)?,
    })
}

impl FleetService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if ID generation or the INSERT fails.
    pub async fn create_asset(&self, new: NewAsset) -> Result<Asset, DatabaseError> {
        let id = self.db().generate_id(PREFIX_ASSET).await?;
        let make = new.make.trim().to_string();
        let model = new.model.trim().to_string();

        self.db()
            .conn()
            .execute(
                "INSERT INTO assets (id, make, model, check_type, company_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id.as_str(),
                    make.as_str(),
                    model.as_str(),
                    new.check_type.as_deref(),
                    new.company_id.as_deref()
                ],
            )
            .await?;

        Ok(Asset {
            id,
            make,
            model,
            check_type: new.check_type,
            company_id: new.company_id,
        })
    }

    /// All assets ordered by make then model.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_assets(&self) -> Result<Vec<Asset>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, make, model, check_type, company_id FROM assets
                 ORDER BY make COLLATE NOCASE, model COLLATE NOCASE, id",
                (),
            )
            .await?;

        let mut assets = Vec::new();
        while let Some(row) = rows.next().await? {
            assets.push(row_to_asset(&row)?);
        }
        Ok(assets)
    }

    /// Distinct makes, sorted case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_makes(&self) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT make FROM assets ORDER BY make COLLATE NOCASE",
                (),
            )
            .await?;
        let mut makes = Vec::new();
        while let Some(row) = rows.next().await? {
            makes.push(row.get::<String>(0)?);
        }
        Ok(makes)
    }

    /// Distinct models for a make (matched case-insensitively).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_models(&self, make: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT model FROM assets WHERE make = ?1 COLLATE NOCASE
                 ORDER BY model COLLATE NOCASE",
                [make],
            )
            .await?;
        let mut models = Vec::new();
        while let Some(row) = rows.next().await? {
            models.push(row.get::<String>(0)?);
        }
        Ok(models)
    }

    /// Checklist template for a make/model pair.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no asset matches, or if the asset
    /// has no template recorded.
    pub async fn get_check_type(&self, make: &str, model: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT check_type FROM assets
                 WHERE make = ?1 COLLATE NOCASE AND model = ?2 COLLATE NOCASE
                   AND check_type IS NOT NULL AND check_type != ''
                 ORDER BY id LIMIT 1",
                [make, model],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_assets(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM assets", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        crate::helpers::get_count(&row, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;
    use pretty_assertions::assert_eq;

    fn asset(make: &str, model: &str, check_type: Option<&str>) -> NewAsset {
        NewAsset {
            make: make.into(),
            model: model.into(),
            check_type: check_type.map(String::from),
            company_id: None,
        }
    }

    async fn seeded() -> FleetService {
        let svc = test_service().await;
        for (make, model, ct) in [
            ("JCB", "535-95", Some("daily_check")),
            ("JCB", "3CX", Some("daily_check")),
            ("John Deere", "6155R", None),
            ("Cat", "140M", Some("grader_startup")),
        ] {
            svc.create_asset(asset(make, model, ct)).await.unwrap();
        }
        svc
    }

    #[tokio::test]
    async fn makes_are_distinct_and_sorted() {
        let svc = seeded().await;
        assert_eq!(
            svc.list_makes().await.unwrap(),
            vec!["Cat", "JCB", "John Deere"]
        );
        assert_eq!(svc.count_assets().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn models_for_make_ignore_case() {
        let svc = seeded().await;
        assert_eq!(svc.list_models("jcb").await.unwrap(), vec!["3CX", "535-95"]);
        assert!(svc.list_models("Volvo").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_type_lookup() {
        let svc = seeded().await;
        assert_eq!(
            svc.get_check_type("cat", "140m").await.unwrap(),
            "grader_startup"
        );
        assert!(matches!(
            svc.get_check_type("John Deere", "6155R").await,
            Err(DatabaseError::NoResult)
        ));
    }

    #[tokio::test]
    async fn create_trims_names() {
        let svc = test_service().await;
        let created = svc.create_asset(asset(" JCB ", " 3CX", None)).await.unwrap();
        assert_eq!(created.make, "JCB");
        assert_eq!(svc.list_assets().await.unwrap()[0].model, "3CX");
    }
}
