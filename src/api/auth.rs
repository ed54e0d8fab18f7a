use std::time::Duration;

use reqwest::Client;
use serde_json::json;

use super::{
    client::ApiClient,
    types::{CreateSessionRequest, RefreshResponse, SessionResponse},
};
use crate::error::ApiError;
use crate::token::TokenPair;

impl ApiClient {
    /// Opens a session with the API.
    ///
    /// Runs outside the refresh pipeline: there is no token to refresh yet,
    /// and a 401 here means rejected credentials, not an expired session.
    pub async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<SessionResponse, ApiError> {
        let response = self
            .http_client()
            .post(format!("{}/sessions", self.base_url()))
            .json(&request)
            .send()
            .await
            .map_err(ApiError::from)?;
        self.map_json_response(response).await
    }
}

/// Exchanges `refresh_token` for a rotated pair.
///
/// One bounded attempt, no bearer header; the refresh token in the body is
/// the credential.
pub(crate) async fn execute_refresh(
    http: &Client,
    base_url: &str,
    refresh_token: &str,
    timeout: Duration,
) -> Result<TokenPair, ApiError> {
    let response = http
        .post(format!("{}/refresh-token", base_url))
        .timeout(timeout)
        .json(&json!({ "token": refresh_token }))
        .send()
        .await
        .map_err(ApiError::from)?;

    let status = response.status();
    if !status.is_success() {
        let message = ApiClient::read_error_message(response).await;
        return Err(ApiError::Api { status, message });
    }
    let refreshed: RefreshResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Decode(format!("failed to parse refresh response: {}", e)))?;
    Ok(TokenPair::new(refreshed.token, refreshed.refresh_token))
}
