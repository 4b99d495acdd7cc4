// Request binding and validation
// Decodes JSON bodies and reports the first violated field constraint

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::companies::models::CompanyType;
use crate::error::ApiError;

/// Error code used by `one_of`
pub const ONE_OF: &str = "oneof";

/// Error code used by the company type constraint
pub const COMPANY_TYPE_ONE_OF: &str = "company-type-oneof";

/// A request body that can be bound from JSON and validated
///
/// `wire_name` maps a Rust field name to the name the client sent, so
/// error messages talk about `type` rather than `company_type`.
pub trait Bindable: DeserializeOwned + Validate {
    fn wire_name(field: &'static str) -> &'static str {
        field
    }
}

/// Decode `body` into `T` and apply its field constraints
pub fn decode<T: Bindable>(body: &[u8]) -> Result<T, ApiError> {
    let value: T = serde_json::from_slice(body).map_err(|e| {
        ApiError::InvalidBody(format!("failed to decode request body: {}", e))
    })?;

    value.validate().map_err(|errors| first_violation::<T>(&errors))?;
    Ok(value)
}

/// Validated JSON extractor
///
/// Rejects with `ApiError::InvalidBody` on malformed JSON or on the first
/// violated constraint.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Bindable,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::InvalidBody(format!("failed to read request body: {}", e))
        })?;

        decode::<T>(&body).map(ValidatedJson)
    }
}

/// Constraint: `value` must be one of `allowed`
pub fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let mut error = ValidationError::new(ONE_OF);
    error.add_param("values".into(), &allowed.join(" "));
    Err(error)
}

/// Pick a single violation out of everything validator reported.
/// Fields are visited in wire-name order so the choice is stable.
fn first_violation<T: Bindable>(errors: &ValidationErrors) -> ApiError {
    let mut fields: Vec<(&'static str, &Vec<ValidationError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (T::wire_name(field), errs))
        .collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .find_map(|(field, errs)| errs.first().map(|error| describe(field, error)))
        .map(ApiError::InvalidBody)
        .unwrap_or_else(|| ApiError::InvalidBody("invalid request body".to_string()))
}

fn describe(field: &str, error: &ValidationError) -> String {
    match error.code.as_ref() {
        "required" => format!("{} is required", field),
        ONE_OF => {
            let values = error
                .params
                .get("values")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .split(' ')
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} must be one of: {}", field, values)
        }
        COMPANY_TYPE_ONE_OF => format!(
            "{} must be one of: {}",
            field,
            CompanyType::wire_names().join(", ")
        ),
        "email" => format!("{} must be a valid email address", field),
        code => error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{} failed constraint '{}'", field, code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[serde(default)]
        #[validate(length(min = 1, code = "required"))]
        alpha: String,
        #[serde(default)]
        #[validate(custom = "probe_colour")]
        colour: String,
        #[serde(default)]
        #[validate(length(max = 3, message = "zeta is too long"))]
        zeta: String,
    }

    fn probe_colour(value: &str) -> Result<(), ValidationError> {
        one_of(value, &["red", "green"])
    }

    impl Bindable for Probe {}

    fn message(err: ApiError) -> String {
        match err {
            ApiError::InvalidBody(msg) => msg,
            other => panic!("expected InvalidBody, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_invalid_body() {
        let err = decode::<Probe>(b"{not json").unwrap_err();
        assert!(message(err).starts_with("failed to decode request body"));
    }

    #[test]
    fn test_only_first_violation_is_reported() {
        let err = decode::<Probe>(br#"{"colour": "blue", "zeta": "toolong"}"#).unwrap_err();
        // alpha sorts before colour and zeta
        assert_eq!(message(err), "alpha is required");
    }

    #[test]
    fn test_oneof_lists_allowed_values() {
        let err = decode::<Probe>(br#"{"alpha": "a", "colour": "blue"}"#).unwrap_err();
        assert_eq!(message(err), "colour must be one of: red, green");
    }

    #[test]
    fn test_custom_message_is_used_by_default() {
        let err = decode::<Probe>(br#"{"alpha": "a", "colour": "red", "zeta": "toolong"}"#)
            .unwrap_err();
        assert_eq!(message(err), "zeta is too long");
    }

    #[test]
    fn test_valid_body_decodes() {
        let probe = decode::<Probe>(br#"{"alpha": "a", "colour": "green", "zeta": "ok"}"#).unwrap();
        assert_eq!(probe.alpha, "a");
        assert_eq!(probe.colour, "green");
    }
}
