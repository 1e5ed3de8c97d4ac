//! Session lookup against the Supabase auth service.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::SupabaseConfig;
use crate::gate::SessionIdentity;
use crate::session::token::access_token;
use crate::session::{SessionError, SessionProvider};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

/// Validates access tokens with `GET /auth/v1/user`.
#[derive(Debug, Clone)]
pub struct SupabaseSessionProvider {
    client: reqwest::Client,
    user_url: String,
    anon_key: String,
    cookie_name: String,
}

impl SupabaseSessionProvider {
    pub fn new(config: &SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
            cookie_name: config.auth_cookie.clone(),
        })
    }
}

#[async_trait]
impl SessionProvider for SupabaseSessionProvider {
    async fn identity(&self, headers: &HeaderMap) -> Result<SessionIdentity, SessionError> {
        let Some(token) = access_token(headers, &self.cookie_name) else {
            return Ok(SessionIdentity::Absent);
        };

        let res = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => {
                let user: AuthUser = res.json().await?;
                Ok(SessionIdentity::present(user.id))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                tracing::debug!("Access token rejected by auth service");
                Ok(SessionIdentity::Absent)
            }
            other => Err(SessionError::UnexpectedStatus(other.as_u16())),
        }
    }
}
