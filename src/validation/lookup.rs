use garde::Validate;
use serde::Deserialize;
use sonic_rs::{JsonValueTrait, Value};

use crate::error::{AppError, Result};
use crate::models::credentials::Credentials;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing session string, API ID, or API Hash.";
pub const INVALID_API_ID_MESSAGE: &str = "API ID must be an integer.";
pub const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object.";
pub const INVALID_FIELD_TYPE_MESSAGE: &str = "Session string and API Hash must be strings.";

/// The request payload for a phone number lookup.
///
/// `api_id` is kept as a raw JSON value since clients send it either as a
/// number or as a string.
#[derive(Deserialize, Validate)]
pub struct LookupRequest {
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub session_string: Option<String>,
    #[serde(default)]
    #[garde(skip)]
    pub api_id: Option<Value>,
    #[serde(default)]
    #[garde(required, length(min = 1))]
    pub api_hash: Option<String>,
}

/// Parses a raw request body into a `LookupRequest`.
///
/// A body that is not a JSON object and an object with wrongly typed fields
/// are reported differently.
pub fn parse_lookup_request(body: &[u8]) -> Result<LookupRequest> {
    let invalid_body = || AppError::Validation(INVALID_BODY_MESSAGE.to_string());

    let value: Value = sonic_rs::from_slice(body).map_err(|e| {
        tracing::debug!("Lookup body is not valid JSON: {}", e);
        invalid_body()
    })?;
    if !value.is_object() {
        return Err(invalid_body());
    }

    sonic_rs::from_slice(body).map_err(|e| {
        tracing::debug!("Lookup body has wrongly typed fields: {}", e);
        AppError::Validation(INVALID_FIELD_TYPE_MESSAGE.to_string())
    })
}

/// Whether the API id counts as provided (absent, empty string and zero don't).
fn api_id_present(api_id: &Value) -> bool {
    if api_id.is_null() {
        return false;
    }
    if let Some(text) = api_id.as_str() {
        return !text.is_empty();
    }
    if let Some(number) = api_id.as_i64() {
        return number != 0;
    }
    if let Some(number) = api_id.as_f64() {
        return number != 0.0;
    }
    if let Some(flag) = api_id.as_bool() {
        return flag;
    }
    true
}

/// Converts the API id to the platform's 32-bit credential width.
///
/// Accepts JSON integers and strings holding an optionally signed integer
/// with surrounding whitespace.
pub fn parse_api_id(api_id: &Value) -> Result<i32> {
    let invalid = || AppError::Validation(INVALID_API_ID_MESSAGE.to_string());

    if let Some(text) = api_id.as_str() {
        let trimmed = text.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        return digits.parse::<i32>().map_err(|_| invalid());
    }

    if api_id.is_number() {
        return api_id
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(invalid);
    }

    Err(invalid())
}

/// Validates a lookup request and extracts its credentials.
///
/// Missing fields are reported before the API id is parsed.
pub fn validate_lookup_request(payload: LookupRequest) -> Result<Credentials> {
    let api_id_given = payload.api_id.as_ref().is_some_and(api_id_present);

    if payload.validate().is_err() || !api_id_given {
        return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    let LookupRequest {
        session_string,
        api_id,
        api_hash,
    } = payload;

    let api_id = api_id
        .as_ref()
        .map(parse_api_id)
        .transpose()?
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()))?;

    Ok(Credentials::new(
        session_string.unwrap_or_default(),
        api_id,
        api_hash.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(body: &str) -> Result<Credentials> {
        validate_lookup_request(parse_lookup_request(body.as_bytes())?)
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_numeric_api_id() {
        let credentials =
            validate(r#"{"session_string":"1abc","api_id":12345,"api_hash":"f00d"}"#).unwrap();

        assert_eq!(credentials.session_token(), "1abc");
        assert_eq!(credentials.api_id(), 12345);
        assert_eq!(credentials.api_hash(), "f00d");
    }

    #[test]
    fn accepts_string_api_id_with_whitespace() {
        let credentials =
            validate(r#"{"session_string":"1abc","api_id":" +678 ","api_hash":"f00d"}"#).unwrap();

        assert_eq!(credentials.api_id(), 678);
    }

    #[test]
    fn reports_each_missing_field() {
        let bodies = [
            r#"{"api_id":1,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":1}"#,
            r#"{"session_string":"","api_id":1,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":null,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":0,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":"","api_hash":"h"}"#,
            r#"{}"#,
        ];

        for body in bodies {
            let err = validate(body).unwrap_err();
            assert_eq!(message(err), MISSING_FIELDS_MESSAGE, "body: {}", body);
        }
    }

    #[test]
    fn missing_field_wins_over_bad_api_id() {
        let err = validate(r#"{"session_string":"s","api_id":"abc"}"#).unwrap_err();

        assert_eq!(message(err), MISSING_FIELDS_MESSAGE);
    }

    #[test]
    fn rejects_non_integer_api_ids() {
        let bodies = [
            r#"{"session_string":"s","api_id":"abc","api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":"12.5","api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":12.5,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":true,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":[1],"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":"99999999999","api_hash":"h"}"#,
        ];

        for body in bodies {
            let err = validate(body).unwrap_err();
            assert_eq!(message(err), INVALID_API_ID_MESSAGE, "body: {}", body);
        }
    }

    #[test]
    fn reports_wrongly_typed_fields() {
        let bodies = [
            r#"{"session_string":123,"api_id":1,"api_hash":"h"}"#,
            r#"{"session_string":"s","api_id":1,"api_hash":["h"]}"#,
        ];

        for body in bodies {
            let err = validate(body).unwrap_err();
            assert_eq!(message(err), INVALID_FIELD_TYPE_MESSAGE, "body: {}", body);
        }
    }

    #[test]
    fn rejects_non_object_bodies() {
        for body in ["", "null", "[1,2]", "[]", "\"text\"", "{not json"] {
            let err = validate(body).unwrap_err();
            assert_eq!(message(err), INVALID_BODY_MESSAGE, "body: {:?}", body);
        }
    }
}
