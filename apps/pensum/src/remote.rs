//! # Remote Snapshot Storage
//!
//! Stores and retrieves board snapshots in a Git repository through the
//! GitHub contents API, keyed by user email. Uploads are authenticated
//! PUTs (carrying the existing file SHA on update); downloads are
//! unauthenticated GETs against the same fixed path.
//!
//! This is an external system boundary: a pulled snapshot goes through the
//! same validated import path as a local file, so a failure here never
//! partially mutates the board.

use crate::config::RemoteConfig;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from the remote storage layer.
#[derive(Debug)]
pub enum RemoteError {
    /// Cannot reach the remote API.
    ConnectionFailed(String),
    /// 401/403 - invalid or missing token.
    Unauthorized,
    /// No snapshot stored for this user.
    NotFound,
    /// 429 Too Many Requests.
    RateLimited,
    /// The API returned an unexpected status.
    ServerError(u16, String),
    /// Failed to parse or decode the response body.
    ParseError(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to remote storage at {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing token"),
            Self::NotFound => write!(f, "No saved data found for this user"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::ServerError(status, msg) => write!(f, "Remote error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for RemoteError {}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the snapshot repository.
#[derive(Clone)]
pub struct RemoteStore {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteStore {
    /// Create a client against the configured repository.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Repository-relative file path for a user, with the email sanitized
    /// into a safe file name.
    #[must_use]
    pub fn user_file_path(&self, email: &str) -> String {
        let sanitized: String = email
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}/{sanitized}.json", self.config.users_path)
    }

    fn contents_url(&self, email: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base,
            self.config.owner,
            self.config.repo,
            self.user_file_path(email)
        )
    }

    /// Send a request and map connection errors.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        req.header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", concat!("pensum/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| RemoteError::ConnectionFailed(format!("{}: {e}", self.config.api_base)))
    }

    /// Map status codes common to every endpoint.
    fn check_status(status: reqwest::StatusCode) -> Result<(), RemoteError> {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RemoteError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RemoteError::RateLimited);
        }
        Ok(())
    }

    /// SHA of the stored file, `None` when it does not exist yet. Updates
    /// through the contents API must carry the previous SHA.
    async fn current_sha(&self, email: &str, token: &str) -> Result<Option<String>, RemoteError> {
        let req = self
            .http
            .get(self.contents_url(email))
            .bearer_auth(token);
        let resp = self.send(req).await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check_status(resp.status())?;

        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(e.to_string()))?;
        Ok(body
            .get("sha")
            .and_then(|v| v.as_str())
            .map(ToString::to_string))
    }

    /// Upload a snapshot for the given user, creating or updating the file.
    pub async fn push_snapshot(
        &self,
        email: &str,
        snapshot_json: &str,
        token: &str,
    ) -> Result<(), RemoteError> {
        let sha = self.current_sha(email, token).await?;

        let mut body = serde_json::json!({
            "message": format!("Update pensum data for {email}"),
            "content": BASE64.encode(snapshot_json.as_bytes()),
            "branch": "main",
        });
        if let Some(sha) = sha {
            body["sha"] = Value::String(sha);
        }

        let req = self
            .http
            .put(self.contents_url(email))
            .bearer_auth(token)
            .json(&body);
        let resp = self.send(req).await?;
        let status = resp.status();

        Self::check_status(status)?;
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(RemoteError::ServerError(status.as_u16(), detail));
        }
        Ok(())
    }

    /// Download the snapshot stored for the given user. Public read, no
    /// token needed.
    pub async fn pull_snapshot(&self, email: &str) -> Result<Vec<u8>, RemoteError> {
        let req = self.http.get(self.contents_url(email));
        let resp = self.send(req).await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        Self::check_status(status)?;
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(RemoteError::ServerError(status.as_u16(), detail));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::ParseError(e.to_string()))?;
        let content = body
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| RemoteError::ParseError("response has no content field".to_string()))?;

        // The contents API wraps base64 at 60 columns; strip the newlines.
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64
            .decode(compact.as_bytes())
            .map_err(|e| RemoteError::ParseError(e.to_string()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RemoteStore {
        RemoteStore::new(RemoteConfig::default())
    }

    #[test]
    fn email_is_sanitized_into_file_name() {
        let path = store().user_file_path("user+tag@example.com");
        assert_eq!(path, "public/users/user_tag@example.com.json");
    }

    #[test]
    fn safe_characters_pass_through() {
        let path = store().user_file_path("a.b_c-d@e.f");
        assert_eq!(path, "public/users/a.b_c-d@e.f.json");
    }

    #[test]
    fn contents_url_is_rooted_at_repo() {
        let url = store().contents_url("u@e.co");
        assert_eq!(
            url,
            "https://api.github.com/repos/nerinconq/generador-de-pensum/contents/public/users/u@e.co.json"
        );
    }
}
