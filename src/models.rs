//! Request and response shapes exchanged by the facade

use crate::types::{ApiError, ApiVariant};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Email/password pair for registration and login.
/// Fields that were not sent are not forwarded either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Inbound body of `POST /users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl CreateUserRequest {
    /// Validate the body against the variant's rules and build the row to insert
    pub fn into_row(self, variant: ApiVariant) -> Result<NewUserRow, ApiError> {
        let missing = || ApiError::MissingFields(variant.missing_fields_message());
        let name = present(self.name).ok_or_else(missing)?;
        let email = present(self.email).ok_or_else(missing)?;

        let (phone, role) = match variant {
            ApiVariant::Full => (self.phone, self.role),
            ApiVariant::Reduced => (None, None),
        };

        Ok(NewUserRow {
            name,
            email,
            phone,
            role,
        })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Row handed to the storage provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserRow {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A row of the `users` table exactly as the provider returned it.
///
/// No column is typed: ids may be integers, uuids or text, and rows written
/// outside this service may carry nulls anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    columns: Map<String, Value>,
}

impl UserRecord {
    pub fn from_columns(columns: Map<String, Value>) -> Self {
        Self {
            columns,
        }
    }

    pub fn id(&self) -> Option<&Value> {
        self.columns.get("id").filter(|id| !id.is_null())
    }

    pub fn email(&self) -> Option<&str> {
        self.columns.get("email").and_then(Value::as_str)
    }
}

/// Result of a sign-up or password sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: Option<Value>,
    pub session: Option<Value>,
}

impl AuthPayload {
    /// Normalise a raw auth response: a body carrying an `access_token` is a
    /// session embedding its user, anything else is a bare user.
    pub fn from_auth_response(body: Value) -> Self {
        if body.get("access_token").is_some() {
            Self {
                user: body.get("user").cloned().filter(|u| !u.is_null()),
                session: Some(body),
            }
        } else {
            Self {
                user: Some(body).filter(|u| !u.is_null()),
                session: None,
            }
        }
    }
}

/// Identity resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> CreateUserRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_full_variant_keeps_optional_fields() {
        let row = request(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "phone": "555-0101",
            "role": "admin"
        }))
        .into_row(ApiVariant::Full)
        .unwrap();

        assert_eq!(row.phone.as_deref(), Some("555-0101"));
        assert_eq!(row.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_reduced_variant_drops_optional_fields() {
        let row = request(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "phone": "555-0101",
            "role": "admin"
        }))
        .into_row(ApiVariant::Reduced)
        .unwrap();

        assert_eq!(serde_json::to_value(&row).unwrap(), json!({ "name": "Ana", "email": "ana@example.com" }));
    }

    #[test]
    fn test_missing_fields_per_variant() {
        let err = request(json!({ "name": "Ana" })).into_row(ApiVariant::Full).unwrap_err();
        assert_eq!(err, ApiError::MissingFields("missing required fields"));

        let err = request(json!({ "email": "ana@example.com" }))
            .into_row(ApiVariant::Reduced)
            .unwrap_err();
        assert_eq!(err.to_string(), "missing fields: name, email");
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let err = request(json!({ "name": "", "email": "ana@example.com" }))
            .into_row(ApiVariant::Full)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(_)));
    }

    #[test]
    fn test_credentials_omit_absent_fields() {
        let credentials = Credentials {
            email: Some("a@x.com".to_string()),
            password: None,
        };
        assert_eq!(serde_json::to_value(&credentials).unwrap(), json!({ "email": "a@x.com" }));
    }

    #[test]
    fn test_user_record_keeps_provider_columns() {
        let raw = json!({
            "id": 7,
            "name": "Ana",
            "email": "ana@example.com",
            "phone": null,
            "created_at": "2024-05-01T10:00:00Z"
        });
        let record: UserRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.id(), Some(&json!(7)));
        assert_eq!(record.email(), Some("ana@example.com"));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_user_record_accepts_untyped_rows() {
        let raw = json!([
            { "id": "9b2c6c1e-0d7a-4d8e-9a59-3f1b2c3d4e5f", "name": "Ana", "email": "ana@example.com" },
            { "id": 2, "name": null, "email": null }
        ]);
        let records: Vec<UserRecord> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(records[0].id(), Some(&json!("9b2c6c1e-0d7a-4d8e-9a59-3f1b2c3d4e5f")));
        assert_eq!(records[1].email(), None);
        assert_eq!(serde_json::to_value(&records).unwrap(), raw);
    }

    #[test]
    fn test_auth_payload_from_session() {
        let body = json!({
            "access_token": "jwt",
            "token_type": "bearer",
            "user": { "id": "u1", "email": "a@x.com" }
        });
        let payload = AuthPayload::from_auth_response(body.clone());
        assert_eq!(payload.user, Some(json!({ "id": "u1", "email": "a@x.com" })));
        assert_eq!(payload.session, Some(body));
    }

    #[test]
    fn test_auth_payload_from_bare_user() {
        let body = json!({ "id": "u1", "email": "a@x.com", "confirmation_sent_at": "2024-05-01T10:00:00Z" });
        let payload = AuthPayload::from_auth_response(body.clone());
        assert_eq!(payload.user, Some(body));
        assert_eq!(payload.session, None);
        assert_eq!(serde_json::to_value(&payload).unwrap()["session"], Value::Null);
    }
}
