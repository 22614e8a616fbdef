//! Field validators shared by entities and services.
//!
//! Each returns `ModelError::Validation` naming the offending field.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use crate::errors::ModelError;

fn invalid(msg: impl Into<String>) -> ModelError { ModelError::Validation(msg.into()) }

/// Non-empty after trimming.
pub fn required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

/// Finite and strictly positive.
pub fn positive_amount(field: &str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{field} must be a positive number")));
    }
    Ok(())
}

pub fn at_least(field: &str, value: i64, min: i64) -> Result<(), ModelError> {
    if value < min {
        return Err(invalid(format!("{field} must be at least {min}")));
    }
    Ok(())
}

/// Longest schedule a campaign or vote may span, in days.
pub const MAX_SCHEDULE_DAYS: i64 = 36_500;

/// `start + days`, rejecting spans outside `1..=MAX_SCHEDULE_DAYS`.
pub fn days_after(field: &str, start: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, ModelError> {
    if !(1..=MAX_SCHEDULE_DAYS).contains(&days) {
        return Err(invalid(format!("{field} must be between 1 and {MAX_SCHEDULE_DAYS} days")));
    }
    TimeDelta::try_days(days)
        .and_then(|span| start.checked_add_signed(span))
        .ok_or_else(|| invalid(format!("{field} is out of range")))
}

pub fn email(value: &str) -> Result<(), ModelError> {
    let ok = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !ok {
        return Err(invalid("email must be a valid email address"));
    }
    Ok(())
}

pub fn http_url(field: &str, value: &str) -> Result<(), ModelError> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !value.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(invalid(format!("{field} must be an http(s) URL"))),
    }
}

pub fn json_object(field: &str, value: &Value) -> Result<(), ModelError> {
    if !value.is_object() {
        return Err(invalid(format!("{field} must be a JSON object")));
    }
    Ok(())
}

/// Case-insensitive membership check against the allowed spellings.
pub fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), ModelError> {
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(value.trim())) {
        return Ok(());
    }
    Err(invalid(format!("{field} must be one of: {}", allowed.join(", "))))
}
