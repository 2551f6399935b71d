use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Tests drive this with a plain `HashMap` lookup instead of mutating the
/// process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shop_url = require("SHOPVOICE_SHOP_URL")?;
    if !(shop_url.starts_with("https://") || shop_url.starts_with("http://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHOPVOICE_SHOP_URL".to_string(),
            reason: format!("expected an http(s) origin, got \"{shop_url}\""),
        });
    }
    let shop_url = shop_url.trim_end_matches('/').to_string();
    let shopify_access_token = require("SHOPIFY_ADMIN_ACCESS_TOKEN")?;
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-10");

    let env = parse_environment(&or_default("SHOPVOICE_ENV", "development"))?;
    let bind_addr_raw = or_default("SHOPVOICE_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr =
        bind_addr_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: "SHOPVOICE_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?;
    let log_level = or_default("SHOPVOICE_LOG_LEVEL", "info");

    let voiceflow_api_key = optional("VOICEFLOW_API_KEY");
    let voiceflow_project_id = optional("VOICEFLOW_PROJECT_ID");
    let voiceflow_version_id = optional("VOICEFLOW_VERSION_ID");
    let voiceflow_base_url = or_default("VOICEFLOW_BASE_URL", "https://api.voiceflow.com")
        .trim_end_matches('/')
        .to_string();

    let request_timeout_secs = parse_u64("SHOPVOICE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPVOICE_USER_AGENT", "shopvoice/0.1 (knowledge-sync)");
    let max_retries = parse_u32("SHOPVOICE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("SHOPVOICE_RETRY_BACKOFF_BASE_SECS", "2")?;
    let cache_ttl_secs = parse_u64("SHOPVOICE_CACHE_TTL_SECS", "300")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        shop_url,
        shopify_access_token,
        shopify_api_version,
        voiceflow_api_key,
        voiceflow_project_id,
        voiceflow_version_id,
        voiceflow_base_url,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPVOICE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
