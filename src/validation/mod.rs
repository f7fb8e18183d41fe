//! Declarative per-field request validation. Each rule set checks the raw
//! JSON payload and returns the full violation list, so a request is
//! rejected before any store call is made.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

const PROPERTY_STATUSES: &[&str] = &["available", "occupied", "under_maintenance"];
const CONTRACT_STATUSES: &[&str] = &["active", "terminated", "expired"];

/// Rule set for user registration payloads.
pub fn validate_user(payload: &Value) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if non_empty_string(payload, "name").is_none() {
        errors.push(FieldError::new("name", "Name is required"));
    }
    match string_field(payload, "email") {
        Some(email) if is_email(email) => {}
        _ => errors.push(FieldError::new("email", "Must be a valid email address")),
    }
    match string_field(payload, "password") {
        Some(password) if password.len() >= 6 => {}
        _ => errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters long",
        )),
    }

    collect(errors)
}

/// Rule set for property create/update payloads.
pub fn validate_property(payload: &Value) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if non_empty_string(payload, "name").is_none() {
        errors.push(FieldError::new("name", "Property name is required"));
    }
    if non_empty_string(payload, "address").is_none() {
        errors.push(FieldError::new("address", "Address is required"));
    }
    if non_empty_string(payload, "property_type").is_none() {
        errors.push(FieldError::new("property_type", "Property type is required"));
    }
    match non_empty_string(payload, "status") {
        None => errors.push(FieldError::new("status", "Status is required")),
        Some(status) if !PROPERTY_STATUSES.contains(&status) => errors.push(FieldError::new(
            "status",
            "Status must be available, occupied, or under_maintenance",
        )),
        Some(_) => {}
    }
    if let Some(rent) = payload.get("monthly_rent") {
        if !rent.is_null() && !rent.is_number() {
            errors.push(FieldError::new("monthly_rent", "Monthly rent must be a number"));
        }
    }

    collect(errors)
}

/// Rule set for contract create/update payloads.
pub fn validate_contract(payload: &Value) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if non_empty_string(payload, "property_id").is_none() {
        errors.push(FieldError::new("property_id", "Property ID is required"));
    }
    if non_empty_string(payload, "tenant_name").is_none() {
        errors.push(FieldError::new("tenant_name", "Tenant name is required"));
    }

    let start = match non_empty_string(payload, "start_date") {
        None => {
            errors.push(FieldError::new("start_date", "Start date is required"));
            None
        }
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                errors.push(FieldError::new("start_date", "Start date must be a valid date"));
                None
            }
        },
    };
    match non_empty_string(payload, "end_date") {
        None => errors.push(FieldError::new("end_date", "End date is required")),
        Some(raw) => match parse_date(raw) {
            None => errors.push(FieldError::new("end_date", "End date must be a valid date")),
            Some(end) => {
                if let Some(start) = start {
                    if end <= start {
                        errors.push(FieldError::new("end_date", "End date must be after start date"));
                    }
                }
            }
        },
    }

    match payload.get("monthly_rent") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("monthly_rent", "Monthly rent is required"))
        }
        Some(rent) if !rent.is_number() => {
            errors.push(FieldError::new("monthly_rent", "Monthly rent must be a number"))
        }
        Some(_) => {}
    }
    match non_empty_string(payload, "status") {
        None => errors.push(FieldError::new("status", "Status is required")),
        Some(status) if !CONTRACT_STATUSES.contains(&status) => errors.push(FieldError::new(
            "status",
            "Status must be active, terminated, or expired",
        )),
        Some(_) => {}
    }

    collect(errors)
}

fn collect(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn string_field<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload.get(field).and_then(Value::as_str)
}

fn non_empty_string<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    string_field(payload, field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Accepts date-only (`2026-01-31`) and full RFC 3339 timestamps.
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive())
}

fn is_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        _ => false,
    }
}
