mod error;
mod transport;

pub(crate) use error::{ApiError, ApiErrorKind, ApiResult, TransportError};
#[cfg(test)]
pub(crate) use transport::fake::FakeTransport;
pub(crate) use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

use crate::models::{Credentials, LoginResponse, Note, NoteId, NoteInput, RegisterResponse};
use crate::session::SessionStore;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

const REGISTER_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";

/// Client for the notes backend.
///
/// Every call is a single round trip: no retries, timeouts or pagination.
/// Note calls authenticate with the token currently held by the session store.
#[derive(Clone)]
pub(crate) struct ApiClient<T: Transport = ReqwestTransport> {
    base_url: String,
    session: SessionStore,
    transport: T,
}

impl ApiClient<ReqwestTransport> {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self::with_transport(base_url, session, ReqwestTransport)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base_url: impl Into<String>, session: SessionStore, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            transport,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn username(&self) -> Option<String> {
        self.session.username()
    }

    fn auth_header(&self) -> Option<String> {
        self.session.token().map(|t| format!("Bearer {}", t))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        authorized: bool,
    ) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if authorized {
            if let Some(header) = self.auth_header() {
                headers.push(("Authorization", header));
            }
        }
        let body = match body {
            Some(b) => Some(serde_json::to_string(b).map_err(|e| TransportError(e.to_string()))?),
            None => None,
        };

        tracing::debug!(%method, %url, "api request");
        self.transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
            })
            .await
    }

    /// Auth endpoints surface the server's `error` field when there is one.
    async fn auth_request<R: DeserializeOwned>(
        &self,
        path: &str,
        credentials: &Credentials,
        default_error: &str,
    ) -> ApiResult<R> {
        let res = self
            .send(Method::POST, path, Some(credentials), false)
            .await
            .map_err(|e| {
                tracing::warn!(path, error = %e, "auth request did not complete");
                ApiError::network(default_error)
            })?;

        if !res.is_success() {
            let message = server_error_message(&res.body).unwrap_or_else(|| default_error.to_string());
            tracing::warn!(path, status = res.status, %message, "auth request rejected");
            return Err(ApiError::rejected(res.status, message));
        }

        decode(&res, path, default_error)
    }

    /// Note endpoints map every failure onto one generic message per call.
    async fn notes_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&NoteInput>,
        failure: &str,
    ) -> ApiResult<HttpResponse> {
        let res = self
            .send(method, path, body, true)
            .await
            .map_err(|e| {
                tracing::warn!(path, error = %e, "notes request did not complete");
                ApiError::network(failure)
            })?;

        if res.is_success() {
            Ok(res)
        } else {
            tracing::warn!(path, status = res.status, "notes request rejected");
            Err(ApiError::rejected(res.status, failure))
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> ApiResult<RegisterResponse> {
        self.auth_request(
            "/auth/register",
            &Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
            REGISTER_FAILED,
        )
        .await
    }

    /// Logs in and, on success, stores the returned token and username in the session.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let res: LoginResponse = self
            .auth_request(
                "/auth/login",
                &Credentials {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                LOGIN_FAILED,
            )
            .await?;

        self.session.set_session(&res.token, &res.username);
        Ok(res)
    }

    /// Local only; the backend keeps no server-side session.
    pub fn logout(&self) {
        self.session.clear_session();
    }

    pub async fn get_notes(&self) -> ApiResult<Vec<Note>> {
        const FAILED: &str = "Failed to fetch notes";
        let res = self.notes_request(Method::GET, "/notes", None, FAILED).await?;
        decode(&res, "/notes", FAILED)
    }

    pub async fn get_note(&self, id: NoteId) -> ApiResult<Note> {
        const FAILED: &str = "Failed to fetch note";
        let path = format!("/notes/{id}");
        let res = self.notes_request(Method::GET, &path, None, FAILED).await?;
        decode(&res, &path, FAILED)
    }

    pub async fn create_note(&self, title: &str, content: &str) -> ApiResult<Note> {
        const FAILED: &str = "Failed to create note";
        let body = NoteInput {
            title: title.to_string(),
            content: content.to_string(),
        };
        let res = self
            .notes_request(Method::POST, "/notes", Some(&body), FAILED)
            .await?;
        decode(&res, "/notes", FAILED)
    }

    pub async fn update_note(&self, id: NoteId, title: &str, content: &str) -> ApiResult<Note> {
        const FAILED: &str = "Failed to update note";
        let path = format!("/notes/{id}");
        let body = NoteInput {
            title: title.to_string(),
            content: content.to_string(),
        };
        let res = self
            .notes_request(Method::PUT, &path, Some(&body), FAILED)
            .await?;
        decode(&res, &path, FAILED)
    }

    /// Any 2xx counts as deleted; the body (usually empty on 204) is ignored.
    pub async fn delete_note(&self, id: NoteId) -> ApiResult<()> {
        self.notes_request(
            Method::DELETE,
            &format!("/notes/{id}"),
            None,
            "Failed to delete note",
        )
        .await
        .map(|_| ())
    }
}

fn decode<R: DeserializeOwned>(res: &HttpResponse, path: &str, failure: &str) -> ApiResult<R> {
    serde_json::from_str(&res.body).map_err(|e| {
        tracing::warn!(path, error = %e, "unexpected response body");
        ApiError::decode(failure)
    })
}

fn server_error_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v.get("error")
        .and_then(|e| e.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
