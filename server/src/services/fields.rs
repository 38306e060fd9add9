//! Input normalization shared by the CRUD services.
//!
//! Patch bodies use `Option<String>` for nullable text columns: an absent
//! field keeps the stored value, a blank string clears it, anything else
//! replaces it (trimmed).

/// Trim and drop blank values.
#[must_use]
pub fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Apply a nullable-text patch to the stored value.
#[must_use]
pub fn merge(current: Option<String>, patch: Option<String>) -> Option<String> {
    match patch {
        None => current,
        Some(value) => clean(Some(value)),
    }
}

/// Trim a required text field, rejecting blanks.
///
/// # Errors
///
/// Returns a validation message naming `field` when the value is blank.
pub fn required(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be blank"));
    }
    Ok(trimmed.to_owned())
}

/// Reject negative money amounts.
///
/// # Errors
///
/// Returns a validation message naming `field` when `cents < 0`.
pub fn non_negative(field: &str, cents: i64) -> Result<i64, String> {
    if cents < 0 {
        return Err(format!("{field} must not be negative"));
    }
    Ok(cents)
}

/// Accept an absent email or one with an `@` that is neither first nor last.
///
/// # Errors
///
/// Returns a validation message quoting the rejected address.
pub fn check_email(email: Option<&str>) -> Result<(), String> {
    match email {
        Some(email) if !email.contains('@') || email.starts_with('@') || email.ends_with('@') => {
            Err(format!("invalid email: {email}"))
        }
        _ => Ok(()),
    }
}

/// Clamp a caller-supplied page size.
#[must_use]
pub fn limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, max)
}

/// Describe a foreign key violation as bad input instead of a server fault.
///
/// Returns `None` for every other error.
#[must_use]
pub fn unknown_reference(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Some(reference_message(db.table(), db.constraint()))
        }
        _ => None,
    }
}

/// `orders_employee_id_fkey` on `orders` → `employee_id does not match an existing record`.
#[must_use]
pub fn reference_message(table: Option<&str>, constraint: Option<&str>) -> String {
    let column = constraint.map(|name| {
        let name = name.strip_suffix("_fkey").unwrap_or(name);
        table
            .and_then(|table| name.strip_prefix(table))
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(name)
    });
    match column {
        Some(column) => format!("{column} does not match an existing record"),
        None => "reference does not match an existing record".to_owned(),
    }
}
