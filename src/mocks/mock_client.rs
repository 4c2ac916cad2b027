use crate::models::{AuthPayload, AuthenticatedUser, Credentials, NewUserRow, UserRecord};
use crate::provider::{BackendClient, ProviderError, ProviderResult};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    id: String,
    email: String,
    password: String,
    created_at: String,
}

impl Account {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "aud": "authenticated",
            "role": "authenticated",
            "email": self.email,
            "created_at": self.created_at,
        })
    }
}

#[derive(Debug, Default)]
struct MockState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    users: Vec<UserRecord>,
    next_id: i64,
    failure: Option<String>,
    get_user_calls: usize,
    insert_calls: usize,
    calls: usize,
}

/// In-memory stand-in for the hosted backend.
///
/// Behaves like the provider for the operations the facade uses, and counts
/// calls so callers can check which operations were reached.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the users table; ids are assigned in insertion order
    pub fn with_users(rows: Vec<NewUserRow>) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.lock();
            for row in rows {
                insert_row(&mut state, row);
            }
        }
        backend
    }

    /// Pre-populate the users table with rows as another writer stored them
    pub fn with_records(records: Vec<UserRecord>) -> Self {
        let backend = Self::new();
        {
            let mut state = backend.lock();
            state.next_id = records
                .iter()
                .filter_map(|record| record.id().and_then(Value::as_i64))
                .max()
                .unwrap_or(0);
            state.users = records;
        }
        backend
    }

    /// Create an account directly and return a valid access token for it
    pub fn register_account(&self, email: &str, password: &str) -> String {
        let mut state = self.lock();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        state.accounts.insert(email.to_string(), account);
        issue_token(&mut state, email)
    }

    /// Make every subsequent operation fail with `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    pub fn get_user_calls(&self) -> usize {
        self.lock().get_user_calls
    }

    pub fn insert_calls(&self) -> usize {
        self.lock().insert_calls
    }

    pub fn stored_users(&self) -> Vec<UserRecord> {
        self.lock().users.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call and apply the configured failure, if any
    fn begin(&self) -> ProviderResult<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls += 1;
        if let Some(message) = state.failure.clone() {
            return Err(ProviderError::new(message));
        }
        Ok(state)
    }
}

fn issue_token(state: &mut MockState, email: &str) -> String {
    let token = format!("mock-{}", Uuid::new_v4());
    state.tokens.insert(token.clone(), email.to_string());
    token
}

fn session_for(state: &mut MockState, account: &Account) -> Value {
    let token = issue_token(state, &account.email);
    json!({
        "access_token": token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": Uuid::new_v4().simple().to_string(),
        "user": account.to_json(),
    })
}

fn insert_row(state: &mut MockState, row: NewUserRow) -> UserRecord {
    state.next_id += 1;
    let mut columns = Map::new();
    columns.insert("id".to_string(), Value::from(state.next_id));
    columns.insert("name".to_string(), Value::String(row.name));
    columns.insert("email".to_string(), Value::String(row.email));
    if let Some(phone) = row.phone {
        columns.insert("phone".to_string(), Value::String(phone));
    }
    if let Some(role) = row.role {
        columns.insert("role".to_string(), Value::String(role));
    }

    let record = UserRecord::from_columns(columns);
    state.users.push(record.clone());
    record
}

/// `order=id.asc`: numbers numerically, anything else by its text
fn compare_ids(a: &UserRecord, b: &UserRecord) -> Ordering {
    match (a.id(), b.id()) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().partial_cmp(&y.as_f64()).unwrap_or(Ordering::Equal)
        },
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (x, y) => x.is_none().cmp(&y.is_none()),
    }
}

fn credential_parts(credentials: &Credentials) -> ProviderResult<(&str, &str)> {
    let email = credentials.email.as_deref().filter(|e| !e.is_empty());
    let password = credentials.password.as_deref().filter(|p| !p.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        (None, _) => Err(ProviderError::with_status(400, "missing email or phone")),
        (Some(_), None) => Err(ProviderError::with_status(400, "Signup requires a valid password")),
    }
}

#[async_trait]
impl BackendClient for MockBackend {
    async fn sign_up(&self, credentials: &Credentials) -> ProviderResult<AuthPayload> {
        let mut state = self.begin()?;
        let (email, password) = credential_parts(credentials)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(ProviderError::with_status(
                422,
                format!("Password should be at least {MIN_PASSWORD_LENGTH} characters."),
            ));
        }
        if state.accounts.contains_key(email) {
            return Err(ProviderError::with_status(422, "User already registered"));
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        state.accounts.insert(account.email.clone(), account.clone());
        let session = session_for(&mut state, &account);
        Ok(AuthPayload::from_auth_response(session))
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> ProviderResult<AuthPayload> {
        let mut state = self.begin()?;
        let (email, password) = credential_parts(credentials)?;

        let account = match state.accounts.get(email) {
            Some(account) if account.password == password => account.clone(),
            _ => return Err(ProviderError::with_status(400, "Invalid login credentials")),
        };
        let session = session_for(&mut state, &account);
        Ok(AuthPayload::from_auth_response(session))
    }

    async fn get_user(&self, token: &str) -> ProviderResult<Option<AuthenticatedUser>> {
        let mut state = self.begin()?;
        state.get_user_calls += 1;

        let account = state
            .tokens
            .get(token)
            .and_then(|email| state.accounts.get(email))
            .ok_or_else(|| ProviderError::with_status(403, "invalid JWT: unable to parse or verify signature"))?;

        Ok(Some(AuthenticatedUser {
            id: account.id.clone(),
            email: Some(account.email.clone()),
        }))
    }

    async fn list_users(&self) -> ProviderResult<Vec<UserRecord>> {
        let state = self.begin()?;
        let mut users = state.users.clone();
        users.sort_by(compare_ids);
        Ok(users)
    }

    async fn insert_users(&self, rows: &[NewUserRow]) -> ProviderResult<Vec<UserRecord>> {
        let mut state = self.begin()?;
        state.insert_calls += 1;

        if let Some(row) = rows.iter().find(|row| state.users.iter().any(|u| u.email() == Some(row.email.as_str()))) {
            return Err(ProviderError::with_status(
                409,
                format!(
                    "duplicate key value violates unique constraint \"users_email_key\" ({})",
                    row.email
                ),
            ));
        }

        Ok(rows.iter().cloned().map(|row| insert_row(&mut state, row)).collect())
    }
}
