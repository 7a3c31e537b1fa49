//! Staff repository.

use fc_core::entities::{NewStaff, Staff};
use fc_core::ids::PREFIX_STAFF;

use crate::error::{DatabaseError, map_unique_violation};
use crate::helpers::{get_count, get_opt_string};
use crate::service::FleetService;

fn row_to_staff(row: &libsql::Row) -> Result<Staff, DatabaseError> {
    Ok(Staff {
        id: row.get(0)?,
        name: row.get(1)?,
        employee_number: get_opt_string(row, 2)?,
        company_id: get_opt_string(row, 3)?,
    })
}

impl FleetService {
    /// # Errors
    ///
    /// Returns `DatabaseError::Conflict` if the employee number is taken.
    pub async fn create_staff(&self, new: NewStaff) -> Result<Staff, DatabaseError> {
        let id = self.db().generate_id(PREFIX_STAFF).await?;
        let employee_number = new.employee_number.filter(|n| !n.trim().is_empty());

        self.db()
            .conn()
            .execute(
                "INSERT INTO staff (id, name, employee_number, company_id) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    id.as_str(),
                    new.name.as_str(),
                    employee_number.as_deref(),
                    new.company_id.as_deref()
                ],
            )
            .await
            .map_err(|e| map_unique_violation(e, "employee number already registered"))?;

        Ok(Staff {
            id,
            name: new.name,
            employee_number,
            company_id: new.company_id,
        })
    }

    /// Staff ordered by name, optionally scoped to one tenant.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_staff(&self, company_id: Option<&str>) -> Result<Vec<Staff>, DatabaseError> {
        let mut rows = match company_id {
            Some(company) => {
                self.db()
                    .conn()
                    .query(
                        "SELECT id, name, employee_number, company_id FROM staff
                         WHERE company_id = ?1 ORDER BY name, id",
                        [company],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        "SELECT id, name, employee_number, company_id FROM staff ORDER BY name, id",
                        (),
                    )
                    .await?
            }
        };

        let mut staff = Vec::new();
        while let Some(row) = rows.next().await? {
            staff.push(row_to_staff(&row)?);
        }
        Ok(staff)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no staff member has this ID.
    pub async fn delete_staff(&self, id: &str) -> Result<(), DatabaseError> {
        let affected = self
            .db()
            .conn()
            .execute("DELETE FROM staff WHERE id = ?1", [id])
            .await?;
        if affected == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_staff(&self) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM staff", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_count(&row, 0)
    }
}
