use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::token_exchange::TokenExchangeError;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TokenResponse {
    pub token: String,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TokenExchangeError> for ApiError {
    fn from(err: TokenExchangeError) -> Self {
        match &err {
            TokenExchangeError::DisallowedBaseUrl(_) => ApiError::bad_request(err.to_string()),
            TokenExchangeError::Rejected { status } => ApiError::new(*status, err.to_string()),
            TokenExchangeError::NoResponse(source) => {
                tracing::error!(error = %source, "token endpoint unreachable");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            TokenExchangeError::InvalidResponse(source) => {
                tracing::error!(error = %source, "token response unreadable");
                ApiError::new(StatusCode::BAD_GATEWAY, err.to_string())
            }
        }
    }
}

pub(super) async fn exchange_token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (Some(username), Some(password), Some(base_url)) = (
        present(body.username.as_deref()),
        present(body.password.as_deref()),
        present(body.base_url.as_deref()),
    ) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let token = state.tokens.exchange(base_url, username, password).await?;
    Ok(Json(TokenResponse { token }))
}
