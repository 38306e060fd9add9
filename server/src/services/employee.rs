//! Employee records.

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ErrorClass, ErrorCode, UnknownVariant};
use crate::services::fields;

const EMPLOYEE_COLUMNS: &str = "id, name, role, phone, email, active, created_at";

#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    #[error("employee not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for EmployeeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_EMPLOYEE_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Validation(_) => ErrorClass::Invalid,
            Self::Database(_) => ErrorClass::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Admin,
    Cashier,
    Cook,
    Waiter,
    Delivery,
}

impl EmployeeRole {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Cashier => "cashier",
            Self::Cook => "cook",
            Self::Waiter => "waiter",
            Self::Delivery => "delivery",
        }
    }

    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Self::Admin),
            "cashier" => Some(Self::Cashier),
            "cook" => Some(Self::Cook),
            "waiter" => Some(Self::Waiter),
            "delivery" => Some(Self::Delivery),
            _ => None,
        }
    }
}

impl TryFrom<String> for EmployeeRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value).ok_or(UnknownVariant { kind: "employee role", value })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: EmployeeRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub role: EmployeeRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<EmployeeRole>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

impl EmployeePatch {
    /// # Errors
    ///
    /// Returns [`EmployeeError::Validation`] for a blank name or malformed email.
    pub fn apply(self, employee: &mut Employee) -> Result<(), EmployeeError> {
        if let Some(name) = self.name {
            employee.name = fields::required("name", &name).map_err(EmployeeError::Validation)?;
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(active) = self.active {
            employee.active = active;
        }
        employee.phone = fields::merge(employee.phone.take(), self.phone);
        let email = fields::merge(employee.email.take(), self.email);
        fields::check_email(email.as_deref()).map_err(EmployeeError::Validation)?;
        employee.email = email;
        Ok(())
    }
}

/// # Errors
///
/// Returns a validation error for a blank name or malformed email, or a database error.
pub async fn create_employee(pool: &PgPool, input: NewEmployee) -> Result<Employee, EmployeeError> {
    let name = fields::required("name", &input.name).map_err(EmployeeError::Validation)?;
    let email = fields::clean(input.email);
    fields::check_email(email.as_deref()).map_err(EmployeeError::Validation)?;
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "INSERT INTO employees (id, name, role, phone, email, active)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {EMPLOYEE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(input.role.as_str())
    .bind(fields::clean(input.phone))
    .bind(&email)
    .bind(input.active)
    .fetch_one(pool)
    .await?;

    tracing::info!(employee_id = %employee.id, role = employee.role.as_str(), "employee created");
    Ok(employee)
}

/// List employees by name, optionally only active or inactive ones.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_employees(pool: &PgPool, active: Option<bool>) -> Result<Vec<Employee>, EmployeeError> {
    let mut builder = QueryBuilder::new(format!("SELECT {EMPLOYEE_COLUMNS} FROM employees"));
    if let Some(active) = active {
        builder.push(" WHERE active = ").push_bind(active);
    }
    builder.push(" ORDER BY name ASC");
    Ok(builder.build_query_as::<Employee>().fetch_all(pool).await?)
}

/// # Errors
///
/// Returns [`EmployeeError::NotFound`] when the id is unknown.
pub async fn get_employee(pool: &PgPool, id: Uuid) -> Result<Employee, EmployeeError> {
    sqlx::query_as::<_, Employee>(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(EmployeeError::NotFound(id))
}

/// # Errors
///
/// Returns not-found, validation or database errors.
pub async fn update_employee(pool: &PgPool, id: Uuid, patch: EmployeePatch) -> Result<Employee, EmployeeError> {
    let mut employee = get_employee(pool, id).await?;
    patch.apply(&mut employee)?;

    let employee = sqlx::query_as::<_, Employee>(&format!(
        "UPDATE employees SET name = $2, role = $3, phone = $4, email = $5, active = $6
         WHERE id = $1
         RETURNING {EMPLOYEE_COLUMNS}"
    ))
    .bind(id)
    .bind(&employee.name)
    .bind(employee.role.as_str())
    .bind(&employee.phone)
    .bind(&employee.email)
    .bind(employee.active)
    .fetch_optional(pool)
    .await?
    .ok_or(EmployeeError::NotFound(id))?;

    tracing::info!(employee_id = %id, "employee updated");
    Ok(employee)
}

/// # Errors
///
/// Returns [`EmployeeError::NotFound`] when nothing was deleted.
pub async fn delete_employee(pool: &PgPool, id: Uuid) -> Result<(), EmployeeError> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(EmployeeError::NotFound(id));
    }
    tracing::info!(employee_id = %id, "employee deleted");
    Ok(())
}

/// Display name for an optional employee link.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn employee_name(pool: &PgPool, id: Option<Uuid>) -> Result<Option<String>, sqlx::Error> {
    let Some(id) = id else {
        return Ok(None);
    };
    sqlx::query_scalar::<_, String>("SELECT name FROM employees WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: "Carlos".into(),
            role: EmployeeRole::Cook,
            phone: None,
            email: Some("carlos@example.com".into()),
            active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn role_round_trips() {
        for role in [
            EmployeeRole::Admin,
            EmployeeRole::Cashier,
            EmployeeRole::Cook,
            EmployeeRole::Waiter,
            EmployeeRole::Delivery,
        ] {
            assert_eq!(EmployeeRole::from_str(role.as_str()), Some(role));
        }
        assert!(EmployeeRole::try_from("chef".to_owned()).is_err());
    }

    #[test]
    fn patch_deactivates_and_changes_role() {
        let mut employee = stored();
        let patch = EmployeePatch {
            role: Some(EmployeeRole::Cashier),
            active: Some(false),
            email: Some(String::new()),
            ..EmployeePatch::default()
        };
        patch.apply(&mut employee).unwrap();
        assert_eq!(employee.role, EmployeeRole::Cashier);
        assert!(!employee.active);
        assert_eq!(employee.email, None);
        assert_eq!(employee.name, "Carlos");
    }

    #[test]
    fn new_employee_defaults_to_active() {
        let input: NewEmployee = serde_json::from_str(r#"{"name":"Sofía","role":"waiter"}"#).unwrap();
        assert!(input.active);
        assert_eq!(input.role, EmployeeRole::Waiter);
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_database() {
        let state = crate::state::test_helpers::test_app_state();
        let input = NewEmployee {
            name: "   ".into(),
            role: EmployeeRole::Cook,
            phone: None,
            email: None,
            active: true,
        };
        assert!(matches!(create_employee(&state.pool, input).await, Err(EmployeeError::Validation(_))));
    }

    #[test]
    fn patch_rejects_malformed_email() {
        let mut employee = stored();
        let patch = EmployeePatch { email: Some("carlos.example.com".into()), ..EmployeePatch::default() };
        assert!(matches!(patch.apply(&mut employee), Err(EmployeeError::Validation(msg)) if msg.contains("email")));
        assert_eq!(employee.email.as_deref(), Some("carlos@example.com"));
    }

    #[tokio::test]
    async fn create_rejects_malformed_email_without_database() {
        let state = crate::state::test_helpers::test_app_state();
        let input = NewEmployee {
            name: "Sofía".into(),
            role: EmployeeRole::Waiter,
            phone: None,
            email: Some("sofia@".into()),
            active: true,
        };
        assert!(matches!(create_employee(&state.pool, input).await, Err(EmployeeError::Validation(_))));
    }

    #[tokio::test]
    async fn employee_name_without_id_is_none() {
        let state = crate::state::test_helpers::test_app_state();
        assert_eq!(employee_name(&state.pool, None).await.unwrap(), None);
    }

    #[cfg(feature = "live-db-tests")]
    #[tokio::test]
    async fn live_employee_round_trip() {
        let pool = crate::state::test_helpers::live_pool().await;
        let created = create_employee(
            &pool,
            NewEmployee {
                name: " Round Trip Cook ".into(),
                role: EmployeeRole::Cook,
                phone: Some("555-7001".into()),
                email: Some("cook@example.com".into()),
                active: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.name, "Round Trip Cook");

        let fetched = get_employee(&pool, created.id).await.unwrap();
        assert_eq!(fetched.role, EmployeeRole::Cook);
        assert_eq!(fetched.phone.as_deref(), Some("555-7001"));
        assert_eq!(fetched.email.as_deref(), Some("cook@example.com"));
        assert_eq!(employee_name(&pool, Some(created.id)).await.unwrap().as_deref(), Some("Round Trip Cook"));

        let updated = update_employee(
            &pool,
            created.id,
            EmployeePatch { active: Some(false), role: Some(EmployeeRole::Cashier), ..EmployeePatch::default() },
        )
        .await
        .unwrap();
        assert!(!updated.active);
        assert_eq!(updated.role, EmployeeRole::Cashier);

        let inactive = list_employees(&pool, Some(false)).await.unwrap();
        assert!(inactive.iter().any(|e| e.id == created.id));
        let active = list_employees(&pool, Some(true)).await.unwrap();
        assert!(active.iter().all(|e| e.id != created.id));

        delete_employee(&pool, created.id).await.unwrap();
        assert!(matches!(get_employee(&pool, created.id).await, Err(EmployeeError::NotFound(_))));
        assert!(matches!(delete_employee(&pool, created.id).await, Err(EmployeeError::NotFound(_))));
    }
}
