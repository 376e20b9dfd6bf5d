//! JSON body extraction with validation.
//!
//! `ValidatedJson<T>` deserializes the request body and runs the DTO's
//! `validator` rules, converting failures into the field-to-messages map
//! consumed by the error envelope.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::errors::{AppError, FieldErrors};

/// Flattens `ValidationErrors` into field name → messages, with a
/// `"<field> is invalid"` fallback for rules that carry no message.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if let Some(field) = error_msg
                    .split("missing field `")
                    .nth(1)
                    .and_then(|s| s.split('`').next())
                {
                    return AppError::bad_request(format!("{} is required", field));
                }

                if error_msg.contains("unknown variant") || error_msg.contains("invalid type") {
                    return AppError::bad_request("Invalid field value in request");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(
                        "Missing 'Content-Type: application/json' header",
                    );
                }

                AppError::bad_request("Invalid request body")
            })?;

        value
            .validate()
            .map_err(|errors| AppError::validation(field_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::users::model::RegisterRequestDto;

    #[test]
    fn test_field_errors_carry_rule_messages() {
        let dto: RegisterRequestDto = serde_json::from_value(serde_json::json!({
            "username": "",
            "first_name": "Jane",
            "last_name": "Doe",
            "email": "not-an-email",
            "password": "weak",
            "role": "candidate"
        }))
        .unwrap();

        let errors = field_errors(&dto.validate().unwrap_err());

        assert_eq!(
            errors["email"],
            vec!["Enter a valid email address".to_string()]
        );
        assert_eq!(
            errors["password"],
            vec!["Password must be at least 8 characters long".to_string()]
        );
        assert!(errors.contains_key("username"));
    }
}
