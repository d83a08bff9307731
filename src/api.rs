//! Remote store: record types and the HTTP client for the user CRUD API.
//!
//! The wire protocol is plain REST with JSON bodies: `GET/POST /users` and
//! `PUT/DELETE /users/{id}`. No authentication, no pagination, no retries —
//! each call either succeeds or surfaces its failure to the caller once.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://686cc59c14219674dcc90faf.mockapi.io/api/v1";

/// A user record as stored by the remote API.
///
/// The `id` is an opaque string assigned by the server on creation and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Write payload for create and update calls. Never carries an id; the
/// target record is addressed through the URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

/// The four operations the cache layer needs from a backing store.
///
/// `ApiClient` is the production implementation; tests substitute an
/// in-memory store.
pub trait RemoteStore: Send {
    fn list(&self) -> Result<Vec<UserRecord>, ApiError>;
    fn create(&self, draft: &UserDraft) -> Result<UserRecord, ApiError>;
    fn update(&self, id: &str, draft: &UserDraft) -> Result<UserRecord, ApiError>;
    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Blocking HTTP client for the user API.
///
/// Status-code-as-error is disabled on the agent so 4xx/5xx responses come
/// back as data and the client maps them to `ApiError` itself.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    fn encode(draft: &UserDraft) -> Result<String, ApiError> {
        serde_json::to_string(draft).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

impl RemoteStore for ApiClient {
    fn list(&self) -> Result<Vec<UserRecord>, ApiError> {
        let url = self.users_url();
        tracing::debug!(%url, "GET list");
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = read_body(&mut response)?;
        check_status(status, &body)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn create(&self, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        let url = self.users_url();
        tracing::debug!(%url, name = %draft.name, "POST create");
        let payload = Self::encode(draft)?;
        let mut response = self
            .agent
            .post(&url)
            .content_type("application/json")
            .send(payload.as_bytes())
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = read_body(&mut response)?;
        check_status(status, &body)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn update(&self, id: &str, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        let url = self.user_url(id);
        tracing::debug!(%url, "PUT update");
        let payload = Self::encode(draft)?;
        let mut response = self
            .agent
            .put(&url)
            .content_type("application/json")
            .send(payload.as_bytes())
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = read_body(&mut response)?;
        check_status(status, &body)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.user_url(id);
        tracing::debug!(%url, "DELETE");
        let mut response = self
            .agent
            .delete(&url)
            .call()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        // The server may echo the deleted record or send nothing; either way
        // the body only matters for error reporting.
        let body = read_body(&mut response)?;
        check_status(status, &body)
    }
}

fn read_body(response: &mut ureq::http::Response<ureq::Body>) -> Result<String, ApiError> {
    response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Network(e.to_string()))
}

/// Any 2xx is success; 404 maps to `NotFound`, everything else to `Http`.
fn check_status(status: u16, body: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status,
        body: body.to_string(),
    })
}
