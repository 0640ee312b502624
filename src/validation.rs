//! Domain validation for mood entries.
//!
//! Two granularities, matching the two places candidates arrive from:
//! - `check_payload_types` — coarse boundary check on raw JSON (are the
//!   fields even strings?), used by the create handler before anything else.
//! - `validate_candidate` — the full rule set. Collects every violation
//!   before reporting so a client can fix all of them in one round trip.
//!
//! The emoji set (`Emoji::ALL`) and `NOTE_MAX_LEN` are shared with the
//! schema DDL in `db::pool` so the application rules and the storage
//! constraints cannot drift apart.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::mood::{Emoji, MoodCandidate};

/// Maximum note length, in characters.
pub const NOTE_MAX_LEN: usize = 500;

/// Result of the coarse boundary type check.
#[derive(Debug)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Verify that `date`/`emoji`/`note` are strings when present. Non-string
/// values are rejected outright, never coerced.
pub fn check_payload_types(payload: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    for field in ["date", "emoji", "note"] {
        match payload.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(_)) => {}
            Some(other) => errors.push(format!(
                "Field '{}' must be a string, got {}",
                field,
                json_type_name(other)
            )),
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Full validation. On failure returns every violated rule; on success
/// returns a normalized candidate (empty note collapsed to None).
pub fn validate_candidate(
    date: Option<&str>,
    emoji: Option<&str>,
    note: Option<&str>,
) -> Result<MoodCandidate, Vec<String>> {
    let mut errors = Vec::new();

    let parsed_date = match date {
        None => {
            errors.push("Date is required".to_string());
            None
        }
        Some(s) if !is_date_shaped(s) => {
            errors.push(format!("Date '{}' must use the YYYY-MM-DD format", s));
            None
        }
        // Shape is right; chrono rejects rolled-over values like 2025-02-30.
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                errors.push(format!("Date '{}' is not a valid calendar date", s));
                None
            }
        },
    };

    let parsed_emoji = match emoji {
        None => {
            errors.push("Emoji is required".to_string());
            None
        }
        Some(s) => match Emoji::from_symbol(s) {
            Some(e) => Some(e),
            None => {
                errors.push(format!(
                    "Emoji '{}' is not allowed; must be one of {}",
                    s,
                    Emoji::ALL.map(|e| e.as_symbol()).join(" ")
                ));
                None
            }
        },
    };

    let normalized_note = match note {
        None => None,
        Some("") => None,
        Some(s) => {
            if s.chars().count() > NOTE_MAX_LEN {
                errors.push(format!("Note must be at most {} characters", NOTE_MAX_LEN));
            }
            Some(s.to_string())
        }
    };

    // A None in either slot always comes with an error pushed above.
    match (parsed_date, parsed_emoji) {
        (Some(date), Some(emoji)) if errors.is_empty() => Ok(MoodCandidate {
            date,
            emoji,
            note: normalized_note,
        }),
        _ => Err(errors),
    }
}

/// Strict parse for boundary path params: `YYYY-MM-DD` shape and a real
/// calendar date, or nothing.
pub fn parse_strict_date(s: &str) -> Option<NaiveDate> {
    if !is_date_shaped(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Strict `YYYY-MM-DD` shape: exactly 10 ASCII chars, dashes at positions
/// 4 and 7, digits everywhere else. Chrono alone is lenient about padding.
fn is_date_shaped(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}
