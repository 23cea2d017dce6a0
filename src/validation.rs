//! Field-level validation of game payloads.
//!
//! Every violation is collected so a client sees all problems with a payload at once.

use chrono::{Datelike, Utc};
use serde_json::{Map, Value};

use crate::store::{GameChanges, NewGame};

pub const TITLE_MAX_CHARS: usize = 255;
pub const PLATFORM_MAX_CHARS: usize = 100;
pub const MIN_RELEASE_YEAR: i32 = 1950;

/// How much of a payload must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Creation: `title`, `platform`, `release_year` and `price` are required.
    Full,
    /// Update: only the supplied fields are checked.
    Partial,
}

/// Latest accepted release year, evaluated at call time.
#[must_use]
pub fn max_release_year() -> i32 {
    Utc::now().year() + 2
}

/// Validate a creation payload and extract the new game, defaults applied.
///
/// # Errors
///
/// Returns the full list of violations when the payload is invalid.
pub fn validate_new_game(body: &Value) -> Result<NewGame, Vec<String>> {
    new_game(body, max_release_year())
}

/// Validate an update payload and extract the supplied changes.
///
/// # Errors
///
/// Returns the full list of violations when any supplied field is invalid.
pub fn validate_changes(body: &Value) -> Result<GameChanges, Vec<String>> {
    let (changes, errors) = check(body, Mode::Partial, max_release_year());
    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn new_game(body: &Value, max_year: i32) -> Result<NewGame, Vec<String>> {
    let (changes, errors) = check(body, Mode::Full, max_year);
    if !errors.is_empty() {
        return Err(errors);
    }

    match changes {
        GameChanges {
            title: Some(title),
            platform: Some(platform),
            release_year: Some(release_year),
            price: Some(price),
            completed,
            playtime_hours,
        } => Ok(NewGame {
            title,
            platform,
            release_year,
            price,
            completed: completed.unwrap_or(false),
            playtime_hours: playtime_hours.unwrap_or(0.0),
        }),
        _ => Err(errors),
    }
}

/// Check `body` and return the recognised fields plus every violation, in field order.
fn check(body: &Value, mode: Mode, max_year: i32) -> (GameChanges, Vec<String>) {
    let mut errors = Vec::new();

    let Some(fields) = body.as_object() else {
        errors.push("Request body must be a JSON object".to_string());
        return (GameChanges::default(), errors);
    };

    let required = mode == Mode::Full;
    let changes = GameChanges {
        title: text(fields, "title", TITLE_MAX_CHARS, required, &mut errors),
        platform: text(fields, "platform", PLATFORM_MAX_CHARS, required, &mut errors),
        release_year: year(fields, "release_year", max_year, required, &mut errors),
        price: non_negative(fields, "price", required, &mut errors),
        completed: flag(fields, "completed", &mut errors),
        playtime_hours: non_negative(fields, "playtime_hours", false, &mut errors),
    };

    (changes, errors)
}

fn text(
    fields: &Map<String, Value>,
    name: &str,
    max_chars: usize,
    required: bool,
    errors: &mut Vec<String>,
) -> Option<String> {
    match fields.get(name) {
        None | Some(Value::Null) if required => {
            errors.push(format!("{name} is required"));
            None
        }
        None => None,
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            let len = trimmed.chars().count();
            if len == 0 || len > max_chars {
                errors.push(format!(
                    "{name} must be between 1 and {max_chars} characters"
                ));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            errors.push(format!("{name} must be a string"));
            None
        }
    }
}

fn year(
    fields: &Map<String, Value>,
    name: &str,
    max_year: i32,
    required: bool,
    errors: &mut Vec<String>,
) -> Option<i32> {
    let out_of_range = || format!("{name} must be between {MIN_RELEASE_YEAR} and {max_year}");

    match fields.get(name) {
        None | Some(Value::Null) if required => {
            errors.push(format!("{name} is required"));
            None
        }
        None => None,
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => {
            let year = n
                .as_i64()
                .and_then(|y| i32::try_from(y).ok())
                .filter(|y| (MIN_RELEASE_YEAR..=max_year).contains(y));
            if year.is_none() {
                errors.push(out_of_range());
            }
            year
        }
        Some(_) => {
            errors.push(format!("{name} must be an integer"));
            None
        }
    }
}

fn non_negative(
    fields: &Map<String, Value>,
    name: &str,
    required: bool,
    errors: &mut Vec<String>,
) -> Option<f64> {
    match fields.get(name) {
        None | Some(Value::Null) if required => {
            errors.push(format!("{name} is required"));
            None
        }
        None => None,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(value) if value.is_finite() && value >= 0.0 => Some(value),
            _ => {
                errors.push(format!("{name} must be greater than or equal to 0"));
                None
            }
        },
        Some(_) => {
            errors.push(format!("{name} must be a number"));
            None
        }
    }
}

fn flag(fields: &Map<String, Value>, name: &str, errors: &mut Vec<String>) -> Option<bool> {
    match fields.get(name) {
        None => None,
        Some(Value::Bool(value)) => Some(*value),
        Some(_) => {
            errors.push(format!("{name} must be a boolean"));
            None
        }
    }
}
