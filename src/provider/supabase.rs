//! Supabase implementation of [`BackendClient`]
//!
//! Speaks the GoTrue (`/auth/v1`) and PostgREST (`/rest/v1`) HTTP APIs with a
//! single shared `reqwest` client. Construction does no network I/O.

use super::{BackendClient, ProviderError, ProviderResult, USERS_TABLE};
use crate::models::{AuthPayload, AuthenticatedUser, Credentials, NewUserRow, UserRecord};
use crate::types::StartupError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keys checked, in order, for a human readable message in an error body
const ERROR_MESSAGE_KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

pub struct SupabaseClient {
    http_client: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client for the project at `url` authenticating with `anon_key`
    pub fn connect(url: &str, anon_key: &str) -> Result<Self, StartupError> {
        let http_client = Client::builder()
            .user_agent(concat!("p_prueba_api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StartupError::Client(e.to_string()))?;

        Self::with_http_client(url, anon_key, http_client)
    }

    /// Same as [`connect`](Self::connect) over an already configured HTTP client
    pub fn with_http_client(url: &str, anon_key: &str, http_client: Client) -> Result<Self, StartupError> {
        let mut base_url = Url::parse(url)
            .map_err(|e| StartupError::Client(format!("invalid SUPABASE_URL {url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StartupError::Client(format!("SUPABASE_URL {url:?} is not a base URL")));
        }
        // Url::join drops the last path segment unless it ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
            anon_key: anon_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ProviderResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::new(format!("invalid provider endpoint {path}: {e}")))
    }

    /// Request authenticated with the project key
    fn request(&self, method: Method, path: &str) -> ProviderResult<RequestBuilder> {
        self.request_as(method, path, &self.anon_key)
    }

    /// Request carrying `bearer` as the caller's identity
    fn request_as(&self, method: Method, path: &str, bearer: &str) -> ProviderResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        log::debug!("provider request: {method} {}", url.path());
        Ok(self
            .http_client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer))
    }
}

#[async_trait]
impl BackendClient for SupabaseClient {
    async fn sign_up(&self, credentials: &Credentials) -> ProviderResult<AuthPayload> {
        let body = send(self.request(Method::POST, "auth/v1/signup")?.json(credentials)).await?;
        Ok(AuthPayload::from_auth_response(body))
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> ProviderResult<AuthPayload> {
        let builder = self
            .request(Method::POST, "auth/v1/token")?
            .query(&[("grant_type", "password")])
            .json(credentials);
        let body = send(builder).await?;
        Ok(AuthPayload::from_auth_response(body))
    }

    async fn get_user(&self, token: &str) -> ProviderResult<Option<AuthenticatedUser>> {
        let body = send(self.request_as(Method::GET, "auth/v1/user", token)?).await?;
        if body.is_null() {
            return Ok(None);
        }
        decode(body).map(Some)
    }

    async fn list_users(&self) -> ProviderResult<Vec<UserRecord>> {
        let builder = self
            .request(Method::GET, &format!("rest/v1/{USERS_TABLE}"))?
            .query(&[("select", "*"), ("order", "id.asc")]);
        decode(send(builder).await?)
    }

    async fn insert_users(&self, rows: &[NewUserRow]) -> ProviderResult<Vec<UserRecord>> {
        let builder = self
            .request(Method::POST, &format!("rest/v1/{USERS_TABLE}"))?
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(rows);
        decode(send(builder).await?)
    }
}

/// Send a request and return its JSON body, or the provider's error message
async fn send(builder: RequestBuilder) -> ProviderResult<Value> {
    let response = builder.send().await.map_err(|e| ProviderError::new(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::with_status(status.as_u16(), e.to_string()))?;

    if !status.is_success() {
        return Err(ProviderError::with_status(status.as_u16(), error_message(status, &body)));
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::with_status(status.as_u16(), format!("invalid JSON from provider: {e}"))
    })
}

fn decode<T: DeserializeOwned>(body: Value) -> ProviderResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ProviderError::new(format!("unexpected response shape from provider: {e}")))
}

/// Extract the message from a non-2xx body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let found = ERROR_MESSAGE_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|msg| !msg.is_empty());
        if let Some(msg) = found {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status.canonical_reason().unwrap_or("provider request failed").to_string()
}
