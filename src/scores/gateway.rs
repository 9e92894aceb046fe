use serde_json::{Map, Value};

use crate::api::ScoreDto;
use crate::error::{GatewayError, ValidationErrors};
use crate::model::{DEFAULT_LEVEL, DEFAULT_PLAYER_NAME, DEFAULT_SCORE, NewHighScore, PLAYER_NAME_MAX_CHARS};
use crate::store::ScoreStore;

/// Number of entries the leaderboard listing returns.
pub const TOP_SCORES_LIMIT: u32 = 10;

const NULL_MSG: &str = "This field may not be null.";
const INVALID_INT_MSG: &str = "A valid integer is required.";

pub struct ScoreGateway<S> {
    store: S,
}

impl<S: ScoreStore> ScoreGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list_top_scores(&self) -> Result<Vec<ScoreDto>, GatewayError> {
        let records = self.store.query_top(TOP_SCORES_LIMIT).await?;
        Ok(records.into_iter().map(ScoreDto::from).collect())
    }

    pub async fn submit_score(&self, payload: &Value) -> Result<ScoreDto, GatewayError> {
        let new = validate_submission(payload).map_err(GatewayError::Validation)?;
        let record = self.store.insert(new).await?;
        tracing::info!(id = record.id, "stored high score {}", record);
        Ok(ScoreDto::from(record))
    }
}

/// Checks a submission and builds the record to insert.
/// `id`, `timestamp` and unknown keys are never read.
pub fn validate_submission(payload: &Value) -> Result<NewHighScore, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(fields) = payload.as_object() else {
        errors.add(
            "non_field_errors",
            format!("Invalid data. Expected a dictionary, but got {}.", json_kind(payload)),
        );
        return Err(errors);
    };

    let player_name = player_name_field(fields, &mut errors);
    let score = integer_field(fields, "score", DEFAULT_SCORE, &mut errors);
    let level = integer_field(fields, "level", DEFAULT_LEVEL, &mut errors);

    match (player_name, score, level) {
        (Some(player_name), Some(score), Some(level)) if errors.is_empty() => Ok(NewHighScore {
            player_name,
            score,
            level,
        }),
        _ => Err(errors),
    }
}

fn player_name_field(fields: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<String> {
    const FIELD: &str = "player_name";

    let raw = match fields.get(FIELD) {
        None => return Some(DEFAULT_PLAYER_NAME.to_owned()),
        Some(Value::Null) => {
            errors.add(FIELD, NULL_MSG);
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errors.add(FIELD, "Not a valid string.");
            return None;
        }
    };

    if raw.is_empty() {
        errors.add(FIELD, "This field may not be blank.");
        return None;
    }
    if raw.contains('\0') {
        errors.add(FIELD, "Null characters are not allowed.");
        return None;
    }
    if raw.chars().count() > PLAYER_NAME_MAX_CHARS {
        errors.add(
            FIELD,
            format!("Ensure this field has no more than {} characters.", PLAYER_NAME_MAX_CHARS),
        );
        return None;
    }

    Some(raw.to_owned())
}

fn integer_field(fields: &Map<String, Value>, field: &str, default: i32, errors: &mut ValidationErrors) -> Option<i32> {
    let parsed = match fields.get(field) {
        None => return Some(default),
        Some(Value::Null) => {
            errors.add(field, NULL_MSG);
            return None;
        }
        Some(Value::Number(n)) => number_to_integer(n),
        Some(Value::String(s)) => parse_integer_str(s),
        Some(_) => None,
    };

    let Some(value) = parsed else {
        errors.add(field, INVALID_INT_MSG);
        return None;
    };

    if value > i64::from(i32::MAX) {
        errors.add(field, format!("Ensure this value is less than or equal to {}.", i32::MAX));
        return None;
    }
    if value < i64::from(i32::MIN) {
        errors.add(field, format!("Ensure this value is greater than or equal to {}.", i32::MIN));
        return None;
    }

    Some(value as i32)
}

fn number_to_integer(n: &serde_json::Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    if n.is_u64() {
        // above i64::MAX, only reachable as an out-of-range value
        return Some(i64::MAX);
    }
    n.as_f64().and_then(float_to_integer)
}

/// Floats at or above 1e16 print in exponent notation (`1e+16`), which is
/// not an integer literal, so they are invalid rather than out of range.
const FLOAT_EXPONENT_THRESHOLD: f64 = 1e16;

fn float_to_integer(f: f64) -> Option<i64> {
    if !f.is_finite() || f.fract() != 0.0 || f.abs() >= FLOAT_EXPONENT_THRESHOLD {
        return None;
    }
    Some(f as i64)
}

/// Accepts `"12"`, `" 12 "`, `"-3"` and `"12.0"`/`"12.00"`.
fn parse_integer_str(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = match s.split_once('.') {
        Some((whole, frac)) if frac.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => s,
    };
    if digits.is_empty() || digits == "-" || digits == "+" {
        return None;
    }
    match digits.parse::<i64>() {
        Ok(v) => Some(v),
        // all digits but too long for i64: report as out of range
        Err(_) if digits.trim_start_matches(['-', '+']).chars().all(|c| c.is_ascii_digit()) => {
            Some(if digits.starts_with('-') { i64::MIN } else { i64::MAX })
        }
        Err(_) => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
