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
    /// Shop origin, e.g. `https://demo.myshopify.com`.
    pub shop_url: String,
    pub shopify_access_token: String,
    pub shopify_api_version: String,
    pub voiceflow_api_key: Option<String>,
    pub voiceflow_project_id: Option<String>,
    pub voiceflow_version_id: Option<String>,
    pub voiceflow_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub cache_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("shop_url", &self.shop_url)
            .field("shopify_access_token", &"[redacted]")
            .field("shopify_api_version", &self.shopify_api_version)
            .field(
                "voiceflow_api_key",
                &self.voiceflow_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("voiceflow_project_id", &self.voiceflow_project_id)
            .field("voiceflow_version_id", &self.voiceflow_version_id)
            .field("voiceflow_base_url", &self.voiceflow_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}
