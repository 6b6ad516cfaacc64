use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "OTLIST_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.rate_limit_per_minute, 120);
    assert_eq!(cfg.otapi_base_url, "http://otapi.net/service-json/");
    assert!(cfg.otapi_instance_key.is_none());
    assert_eq!(cfg.otapi_default_language, "es");
    assert_eq!(cfg.otapi_search_timeout_secs, 30);
    assert_eq!(cfg.otapi_detail_timeout_secs, 5);
    assert_eq!(cfg.otapi_path_timeout_secs, 15);
    assert_eq!(cfg.otapi_max_retries, 2);
    assert_eq!(cfg.otapi_retry_backoff_base_ms, 500);
    assert_eq!(cfg.fx_timeout_secs, 5);
    assert_eq!(cfg.fx_cache_ttl_secs, 86_400);
    assert_eq!(
        cfg.auth_allowed_base_urls,
        vec![
            "https://kcstaging.mitimiti.com".to_string(),
            "https://kcpro.mitimiti.com".to_string()
        ]
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("OTLIST_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OTLIST_BIND_ADDR"),
        "expected InvalidEnvVar(OTLIST_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_on_invalid_otlist_env() {
    let mut map = HashMap::new();
    map.insert("OTLIST_ENV", "producton");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OTLIST_ENV"),
        "expected InvalidEnvVar(OTLIST_ENV), got: {result:?}"
    );
}

#[test]
fn search_timeout_override() {
    let mut map = HashMap::new();
    map.insert("OTAPI_SEARCH_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.otapi_search_timeout_secs, 60);
}

#[test]
fn search_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("OTAPI_SEARCH_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OTAPI_SEARCH_TIMEOUT_SECS"),
        "expected InvalidEnvVar(OTAPI_SEARCH_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("OTAPI_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OTAPI_MAX_RETRIES"),
        "expected InvalidEnvVar(OTAPI_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_when_detail_timeout_exceeds_search_timeout() {
    let mut map = HashMap::new();
    map.insert("OTAPI_DETAIL_TIMEOUT_SECS", "31");
    map.insert("OTAPI_SEARCH_TIMEOUT_SECS", "30");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "OTAPI_DETAIL_TIMEOUT_SECS"),
        "expected InvalidEnvVar(OTAPI_DETAIL_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn blank_instance_key_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("OTAPI_INSTANCE_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.otapi_instance_key.is_none());
}

#[test]
fn debug_output_redacts_instance_key() {
    let mut map = HashMap::new();
    map.insert("OTAPI_INSTANCE_KEY", "secret-instance-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("secret-instance-key"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn auth_base_urls_are_trimmed_and_split() {
    let mut map = HashMap::new();
    map.insert(
        "AUTH_ALLOWED_BASE_URLS",
        " https://shop.example.com/ , ,https://staging.example.com",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.auth_allowed_base_urls,
        vec![
            "https://shop.example.com".to_string(),
            "https://staging.example.com".to_string()
        ]
    );
}
