//! CorpusHub HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the annotation flow: save change-set → list history →
//! selective revert → canonical transcript fetch.

use std::time::Duration;

use scriba_engine::document::Document;
use scriba_protocol::{
    HistoryEntry, HistoryResponse, RevertRequest, RevertResponse, SaveRequest, SaveResponse,
};

use crate::auth::{load_auth, AuthCredentials};

/// CorpusHub API client (blocking).
#[derive(Clone)]
pub struct HubClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for hub operations.
#[derive(Debug)]
pub enum HubError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Server returned a validation error (4xx with message)
    Validation(String),
    /// Server answered 2xx but refused the operation (`success: false`)
    Rejected(String),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubError::NotAuthenticated => {
                write!(f, "Not authenticated — run `scriba login` first")
            }
            HubError::Network(msg) => write!(f, "Network error: {}", msg),
            HubError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            HubError::Parse(msg) => write!(f, "Parse error: {}", msg),
            HubError::Validation(msg) => write!(f, "{}", msg),
            HubError::Rejected(msg) => write!(f, "Server refused: {}", msg),
        }
    }
}

impl std::error::Error for HubError {}

/// User info from /api/annotate/me
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct UserInfo {
    #[serde(alias = "username")]
    pub user: String,
    pub country: String,
}

impl HubClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, HubError> {
        let creds = load_auth().ok_or(HubError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("scriba/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    /// Verify the current token and get user info.
    pub fn verify_token(&self) -> Result<UserInfo, HubError> {
        let url = format!("{}/api/annotate/me", self.api_base);
        let resp = self.get(&url, &[])?;
        resp.json::<UserInfo>()
            .map_err(|e| HubError::Parse(e.to_string()))
    }

    /// Send one change-set plus the full document, atomically.
    ///
    /// On failure the caller keeps all pending local state; retry is
    /// simply calling save again.
    pub fn save_transcript(&self, request: &SaveRequest) -> Result<(), HubError> {
        let url = format!("{}/api/annotate/save", self.api_base);
        let body = serde_json::to_value(request).map_err(|e| HubError::Parse(e.to_string()))?;
        let resp = self.post_json(&url, &body)?;
        let result: SaveResponse = resp.json().map_err(|e| HubError::Parse(e.to_string()))?;

        if !result.success {
            return Err(HubError::Rejected(
                result.message.unwrap_or_else(|| "save rejected".into()),
            ));
        }
        Ok(())
    }

    /// Fetch the ordered, append-only change history for a transcript.
    pub fn list_history(
        &self,
        country: &str,
        filename: &str,
    ) -> Result<Vec<HistoryEntry>, HubError> {
        let url = format!("{}/api/annotate/history", self.api_base);
        let resp = self.get(&url, &[("country", country), ("filename", filename)])?;
        let result: HistoryResponse = resp.json().map_err(|e| HubError::Parse(e.to_string()))?;

        if !result.success {
            return Err(HubError::Rejected("history unavailable".into()));
        }
        Ok(result.history)
    }

    /// Ask the server to revert the history entry at `undo_index`
    /// against the current canonical document. Appends a new `undo`
    /// entry server-side; nothing is mutated locally.
    pub fn revert(&self, file: &str, undo_index: usize) -> Result<(), HubError> {
        let url = format!("{}/api/annotate/revert", self.api_base);
        let request = RevertRequest { file: file.to_string(), undo_index };
        let body = serde_json::to_value(&request).map_err(|e| HubError::Parse(e.to_string()))?;
        let resp = self.post_json(&url, &body)?;
        let result: RevertResponse = resp.json().map_err(|e| HubError::Parse(e.to_string()))?;

        if !result.success {
            return Err(HubError::Rejected(
                result.message.unwrap_or_else(|| "revert rejected".into()),
            ));
        }
        Ok(())
    }

    /// Fetch the current canonical document, e.g. after a revert.
    pub fn fetch_transcript(&self, file: &str) -> Result<Document, HubError> {
        let url = format!("{}/api/annotate/transcript", self.api_base);
        let resp = self.get(&url, &[("file", file)])?;
        resp.json::<Document>()
            .map_err(|e| HubError::Parse(e.to_string()))
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Response, HubError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| HubError::Network(e.to_string()))?;

        Self::check_status(response)
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::blocking::Response, HubError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| HubError::Network(e.to_string()))?;

        Self::check_status(response)
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, HubError> {
        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if status == 422 || status == 400 {
                return Err(HubError::Validation(body));
            }
            return Err(HubError::Http(status, body));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HubError::NotAuthenticated.to_string(),
            "Not authenticated — run `scriba login` first"
        );
        assert_eq!(
            HubError::Http(500, "boom".into()).to_string(),
            "HTTP 500: boom"
        );
        assert_eq!(
            HubError::Rejected("stale file".into()).to_string(),
            "Server refused: stale file"
        );
    }

    #[test]
    fn test_user_info_accepts_username_alias() {
        let info: UserInfo =
            serde_json::from_str(r#"{"username":"alice","country":"es"}"#).unwrap();
        assert_eq!(info.user, "alice");
    }
}
