use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_AUTH_BASE_URLS: &str = "https://kcstaging.mitimiti.com,https://kcpro.mitimiti.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; the lookup is injected so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("OTLIST_ENV", "development"))?;

    let bind_addr = or_default("OTLIST_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("OTLIST_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("OTLIST_LOG_LEVEL", "info");
    let rate_limit_per_minute = parse_usize("OTLIST_RATE_LIMIT_PER_MINUTE", "120")?;

    let otapi_base_url = or_default("OTAPI_BASE_URL", "http://otapi.net/service-json/");
    let otapi_instance_key = lookup("OTAPI_INSTANCE_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let otapi_default_language = or_default("OTAPI_DEFAULT_LANGUAGE", "es");
    let otapi_user_agent = or_default("OTAPI_USER_AGENT", "otlist/0.1 (catalog-listing)");
    let otapi_search_timeout_secs = parse_u64("OTAPI_SEARCH_TIMEOUT_SECS", "30")?;
    let otapi_detail_timeout_secs = parse_u64("OTAPI_DETAIL_TIMEOUT_SECS", "5")?;
    let otapi_path_timeout_secs = parse_u64("OTAPI_PATH_TIMEOUT_SECS", "15")?;
    let otapi_max_retries = parse_u32("OTAPI_MAX_RETRIES", "2")?;
    let otapi_retry_backoff_base_ms = parse_u64("OTAPI_RETRY_BACKOFF_BASE_MS", "500")?;

    if otapi_detail_timeout_secs > otapi_search_timeout_secs {
        return Err(invalid(
            "OTAPI_DETAIL_TIMEOUT_SECS",
            format!(
                "detail timeout ({otapi_detail_timeout_secs}s) must not exceed search timeout ({otapi_search_timeout_secs}s)"
            ),
        ));
    }

    let fx_api_url = or_default("FX_API_URL", "https://api.exchangerate-api.com/v4/latest/CNY");
    let fx_timeout_secs = parse_u64("FX_TIMEOUT_SECS", "5")?;
    let fx_cache_ttl_secs = parse_u64("FX_CACHE_TTL_SECS", "86400")?;

    let auth_allowed_base_urls = or_default("AUTH_ALLOWED_BASE_URLS", DEFAULT_AUTH_BASE_URLS)
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        rate_limit_per_minute,
        otapi_base_url,
        otapi_instance_key,
        otapi_default_language,
        otapi_user_agent,
        otapi_search_timeout_secs,
        otapi_detail_timeout_secs,
        otapi_path_timeout_secs,
        otapi_max_retries,
        otapi_retry_backoff_base_ms,
        fx_api_url,
        fx_timeout_secs,
        fx_cache_ttl_secs,
        auth_allowed_base_urls,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "OTLIST_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
