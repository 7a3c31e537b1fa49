//! Shared test utilities for fc-db unit tests.

pub(crate) mod helpers {
    use fc_core::entities::NewChecklist;
    use fc_core::enums::CheckCategory;

    use crate::FleetDb;
    use crate::service::FleetService;

    /// Create an in-memory `FleetService`.
    pub async fn test_service() -> FleetService {
        let db = FleetDb::open_local(":memory:").await.unwrap();
        FleetService::from_db(db)
    }

    /// A minimal checklist submission with no line items.
    pub fn new_checklist(category: CheckCategory, company_id: Option<&str>) -> NewChecklist {
        NewChecklist {
            company_id: company_id.map(String::from),
            staff_name: "Alan Day".into(),
            machine_make: "JCB".into(),
            machine_model: "535-95".into(),
            category,
            items: Vec::new(),
            notes: None,
            completed_at: None,
        }
    }
}
