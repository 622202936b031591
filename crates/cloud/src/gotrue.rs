//! Identity provider backed by a GoTrue-compatible auth server.

use async_trait::async_trait;
use serde::Deserialize;
use upstart_core::identity::{AuthSession, IdentityError, IdentityProvider};
use upstart_core::roles::Role;
use upstart_core::session::{SessionUser, UserMetadata};
use uuid::Uuid;

use reqwest::Url;

use crate::{error_message, join_url, parse_base_url, InvalidBaseUrl};

/// HTTP client for a GoTrue `/auth/v1` API.
pub struct GoTrueClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

/// Errors from the GoTrue REST layer, before classification.
#[derive(Debug, thiserror::Error)]
pub enum GoTrueError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GoTrue returned a non-2xx status code.
    #[error("GoTrue API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

impl From<GoTrueError> for IdentityError {
    fn from(err: GoTrueError) -> Self {
        match err {
            GoTrueError::Request(e) => {
                IdentityError::from_provider(e.status().map(|s| s.as_u16()), e.to_string())
            }
            GoTrueError::ApiError { status, body } => classify(status, &body),
        }
    }
}

/// Map a GoTrue failure response onto [`IdentityError`].
pub fn classify(status: u16, body: &str) -> IdentityError {
    let message = error_message(body);
    let lowered = message.to_ascii_lowercase();

    if lowered.contains("invalid login credentials") {
        return IdentityError::InvalidCredentials;
    }
    if lowered.contains("already registered") || body.contains("user_already_exists") {
        return IdentityError::AlreadyRegistered;
    }
    match status {
        401 | 403 => IdentityError::Unauthorized(message),
        400 if body.contains("invalid_grant") => IdentityError::Unauthorized(message),
        _ => IdentityError::from_provider(Some(status), message),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl GoTrueUser {
    fn into_session_user(self) -> SessionUser {
        SessionUser::from_metadata(
            self.id,
            self.email.unwrap_or_default(),
            UserMetadata::from_json(&self.user_metadata),
        )
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

impl GoTrueSession {
    fn into_auth_session(self) -> AuthSession {
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
            user: self.user.into_session_user(),
        }
    }
}

/// Signup returns a session when email confirmation is disabled and a bare
/// user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupResponse {
    Session(GoTrueSession),
    User(GoTrueUser),
}

impl GoTrueClient {
    /// * `base_url` - Project URL, e.g. `https://xyz.supabase.co`.
    /// * `api_key` - Public (anon) API key sent as the `apikey` header.
    pub fn new(base_url: &str, api_key: String) -> Result<Self, InvalidBaseUrl> {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: String,
    ) -> Result<Self, InvalidBaseUrl> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        join_url(&self.base_url, &format!("auth/v1/{path}"))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.endpoint(path))
            .header("apikey", &self.api_key)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<AuthSession, GoTrueError> {
        let response = self
            .request(reqwest::Method::POST, "token")
            .query(&[("grant_type", grant_type)])
            .json(&body)
            .send()
            .await?;
        let session: GoTrueSession = Self::parse_response(response).await?;
        Ok(session.into_auth_session())
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GoTrueError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GoTrueError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GoTrueError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<SessionUser, IdentityError> {
        let response = self
            .request(reqwest::Method::GET, "user")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(GoTrueError::from)?;
        let user: GoTrueUser = Self::parse_response(response).await?;
        Ok(user.into_session_user())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, IdentityError> {
        let body = serde_json::json!({ "email": email, "password": password });
        Ok(self.token_grant("password", body).await?)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": metadata.to_json(),
        });
        let response = self
            .request(reqwest::Method::POST, "signup")
            .json(&body)
            .send()
            .await
            .map_err(GoTrueError::from)?;
        let user = match Self::parse_response::<SignupResponse>(response).await? {
            SignupResponse::Session(session) => session.user,
            SignupResponse::User(user) => user,
        };
        tracing::info!(user_id = %user.id, "GoTrue signup succeeded");
        Ok(user.into_session_user())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        Ok(self.token_grant("refresh_token", body).await?)
    }

    async fn update_user_metadata(
        &self,
        access_token: &str,
        metadata: UserMetadata,
    ) -> Result<SessionUser, IdentityError> {
        let response = self
            .request(reqwest::Method::PUT, "user")
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "data": metadata.to_json() }))
            .send()
            .await
            .map_err(GoTrueError::from)?;
        let user: GoTrueUser = Self::parse_response(response).await?;
        Ok(user.into_session_user())
    }

    /// GoTrue's `PUT /user` has no precondition, so this reads the user
    /// first and skips the write when a role is present. Two requests
    /// landing between the read and the write can still both write; the
    /// resolver's confirming re-read decides which role is kept.
    async fn assign_role_if_unset(
        &self,
        access_token: &str,
        role: Role,
    ) -> Result<Option<SessionUser>, IdentityError> {
        let current = self.get_user(access_token).await?;
        if current.role.is_some() {
            return Ok(None);
        }
        self.update_user_metadata(access_token, UserMetadata::new_role(role))
            .await
            .map(Some)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self
            .request(reqwest::Method::POST, "logout")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(GoTrueError::from)?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
