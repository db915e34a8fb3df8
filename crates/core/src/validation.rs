//! Payload validation.
//!
//! DTOs derive [`validator::Validate`]; [`validate_payload`] flattens the
//! field errors into a single [`CoreError::Validation`] message so the API
//! layer can report them uniformly.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validation rules of `input`.
pub fn validate_payload<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Render validation errors as `field: message` pairs, sorted by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(email(message = "must be a valid email address"))]
        email: String,
        #[validate(range(min = 0, max = 1000, message = "must be between 0 and 1000"))]
        slots: i32,
    }

    #[test]
    fn valid_payload_passes() {
        let s = Sample {
            name: "Yoga".into(),
            email: "a@example.com".into(),
            slots: 20,
        };
        assert!(validate_payload(&s).is_ok());
    }

    #[test]
    fn errors_are_flattened_and_sorted() {
        let s = Sample {
            name: String::new(),
            email: "nope".into(),
            slots: 1001,
        };
        let err = validate_payload(&s).unwrap_err();
        assert_matches!(&err, CoreError::Validation(msg) if msg ==
            "email: must be a valid email address; name: must not be empty; slots: must be between 0 and 1000");
    }
}
