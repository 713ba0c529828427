//! Google OAuth code exchange and userinfo lookup.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GoogleConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("token exchange failed: {0}")]
    TokenExchange(String),
    #[error("userinfo request failed: {0}")]
    UserInfo(String),
}

/// Profile as returned by Google's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GoogleClient {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Authorization URL the client is sent to.
    pub fn auth_url(&self, redirect_uri: &str) -> String {
        // Static endpoint plus query pairs, cannot fail to parse.
        let url = Url::parse_with_params(
            AUTH_ENDPOINT,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", "email profile"),
                ("access_type", "offline"),
            ],
        )
        .expect("static auth endpoint URL");
        url.to_string()
    }

    /// Exchanges an authorization code for an access token.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<String, GoogleAuthError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleAuthError::TokenExchange(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleAuthError::TokenExchange(format!(
                "status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GoogleAuthError::TokenExchange(e.to_string()))?;
        Ok(token.access_token)
    }

    /// Fetches the authenticated user's Google profile.
    pub async fn fetch_user_info(
        &self,
        access_token: &str,
    ) -> Result<GoogleUserInfo, GoogleAuthError> {
        let response = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleAuthError::UserInfo(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GoogleAuthError::UserInfo(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GoogleAuthError::UserInfo(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_url_carries_client_and_redirect() {
        let client = GoogleClient::new(&GoogleConfig {
            client_id: "my-client".into(),
            client_secret: "shh".into(),
        });
        let url = client.auth_url("http://localhost:8080/api/auth/google/callback");
        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("client_id=my-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fapi%2Fauth%2Fgoogle%2Fcallback"));
        assert!(!url.contains("shh"));
    }
}
