use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub rate_limit_per_minute: usize,
    pub otapi_base_url: String,
    /// Default access key for the CLI; HTTP callers always pass their own.
    pub otapi_instance_key: Option<String>,
    pub otapi_default_language: String,
    pub otapi_user_agent: String,
    pub otapi_search_timeout_secs: u64,
    pub otapi_detail_timeout_secs: u64,
    pub otapi_path_timeout_secs: u64,
    pub otapi_max_retries: u32,
    pub otapi_retry_backoff_base_ms: u64,
    pub fx_api_url: String,
    pub fx_timeout_secs: u64,
    pub fx_cache_ttl_secs: u64,
    /// Commerce environments the token-exchange proxy may forward to.
    pub auth_allowed_base_urls: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("otapi_base_url", &self.otapi_base_url)
            .field(
                "otapi_instance_key",
                &self.otapi_instance_key.as_ref().map(|_| "[redacted]"),
            )
            .field("otapi_default_language", &self.otapi_default_language)
            .field("otapi_user_agent", &self.otapi_user_agent)
            .field("otapi_search_timeout_secs", &self.otapi_search_timeout_secs)
            .field("otapi_detail_timeout_secs", &self.otapi_detail_timeout_secs)
            .field("otapi_path_timeout_secs", &self.otapi_path_timeout_secs)
            .field("otapi_max_retries", &self.otapi_max_retries)
            .field(
                "otapi_retry_backoff_base_ms",
                &self.otapi_retry_backoff_base_ms,
            )
            .field("fx_api_url", &self.fx_api_url)
            .field("fx_timeout_secs", &self.fx_timeout_secs)
            .field("fx_cache_ttl_secs", &self.fx_cache_ttl_secs)
            .field("auth_allowed_base_urls", &self.auth_allowed_base_urls)
            .finish()
    }
}
