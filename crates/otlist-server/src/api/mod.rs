mod auth;
mod categories;
mod currency;
mod products;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use otlist_core::AppConfig;
use otlist_otapi::{ListingError, OtapiClient, OtapiError, SearchOrchestrator};
use otlist_rates::RateCache;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, REQUEST_ID_HEADER};
use crate::token_exchange::TokenExchange;

const TOKEN_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct AppState {
    pub otapi: Arc<OtapiClient>,
    pub rates: Arc<RateCache>,
    pub tokens: Arc<TokenExchange>,
    pub orchestrator: SearchOrchestrator,
    pub default_language: Arc<str>,
    /// Used when a request does not carry its own `instanceKey`.
    pub default_instance_key: Option<Arc<str>>,
}

impl AppState {
    /// Builds every upstream client from configuration.
    ///
    /// # Errors
    ///
    /// Fails when a configured URL does not parse or an HTTP client cannot
    /// be constructed.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let otapi = OtapiClient::from_config(config)?;
        let orchestrator = SearchOrchestrator::new(otapi.timeouts().detail);
        Ok(Self {
            otapi: Arc::new(otapi),
            rates: Arc::new(RateCache::from_config(config)?),
            tokens: Arc::new(TokenExchange::new(
                config.auth_allowed_base_urls.clone(),
                TOKEN_EXCHANGE_TIMEOUT,
            )?),
            orchestrator,
            default_language: Arc::from(config.otapi_default_language.as_str()),
            default_instance_key: config.otapi_instance_key.as_deref().map(Arc::from),
        })
    }

    /// The request's key, else the configured one.
    fn instance_key(&self, requested: Option<&str>) -> Result<String, ApiError> {
        requested
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.default_instance_key.as_deref())
            .map(str::to_owned)
            .ok_or_else(|| ApiError::bad_request("instanceKey is required"))
    }

    fn language(&self, requested: Option<&str>) -> String {
        requested
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&*self.default_language)
            .to_owned()
    }
}

/// Error response: `{ "error": "...", "details": "..." }` with a status
/// mirroring the failure class.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: &self.error,
            details: self.details.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::MissingParameter(_) => ApiError::bad_request(err.to_string()),
            ListingError::Upstream { status, message } => {
                tracing::error!(status, message = %message, "upstream rejected request");
                ApiError::new(
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message,
                )
            }
            ListingError::Unavailable(message) => {
                tracing::error!(error = %message, "upstream unreachable");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable")
                    .with_details(message)
            }
            ListingError::InvalidResponse(message) => {
                tracing::error!(error = %message, "upstream response not understood");
                ApiError::new(StatusCode::BAD_GATEWAY, "Invalid upstream response")
                    .with_details(message)
            }
        }
    }
}

impl From<OtapiError> for ApiError {
    fn from(err: OtapiError) -> Self {
        ListingError::from(err).into()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/category-products",
            get(products::list_category_products),
        )
        .route("/api/v1/item-full-info", get(products::get_item_full_info))
        .route(
            "/api/v1/root-categories",
            get(categories::list_root_categories),
        )
        .route("/api/v1/subcategories", get(categories::list_subcategories))
        .route(
            "/api/v1/categories-tree",
            get(categories::get_categories_tree),
        )
        .route(
            "/api/v1/category-root-path",
            get(categories::get_category_root_path),
        )
        .route(
            "/api/v1/item-root-path",
            get(categories::get_item_root_path),
        )
        .route("/api/v1/currency", get(currency::get_currency_rates))
        .route("/api/v1/auth", post(auth::exchange_token))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
