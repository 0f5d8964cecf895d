//! Runtime configuration read from the environment.

use std::time::Duration;

use ecovolt_api::{LOCAL_BASE_URL, PRODUCTION_BASE_URL};

use crate::cache::DEFAULT_CACHE_TTL;
use crate::validation::MAX_LIMIT;

/// Page size used when neither the caller nor the environment picks one.
pub const DEFAULT_PAGE_LIMIT: u32 = ecovolt_api::DEFAULT_LIMIT;

/// Which backend deployment to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Local,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Local => LOCAL_BASE_URL,
        }
    }
}

/// Settings for a [`Catalog`](crate::Catalog).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Product API root, including `/api/products`.
    pub base_url: String,
    /// Default page size for list requests.
    pub page_limit: u32,
    /// How long cached pages stay fresh.
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_BASE_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl CatalogConfig {
    /// Reads `ECOVOLT_ENV`, `ECOVOLT_API_URL`, `ECOVOLT_PAGE_LIMIT` and
    /// `ECOVOLT_CACHE_TTL_SECS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ECOVOLT_ENV")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            Some("local") | Some("development") | Some("dev") => Environment::Local,
            _ => Environment::Production,
        };
        let base_url = lookup("ECOVOLT_API_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| environment.base_url().to_string());
        let page_limit = env_u64(&lookup, "ECOVOLT_PAGE_LIMIT", u64::from(DEFAULT_PAGE_LIMIT))
            .clamp(1, u64::from(MAX_LIMIT)) as u32;
        let cache_ttl = Duration::from_secs(env_u64(
            &lookup,
            "ECOVOLT_CACHE_TTL_SECS",
            DEFAULT_CACHE_TTL.as_secs(),
        ));
        tracing::debug!(
            "Catalog config: base_url={} page_limit={} cache_ttl={}s",
            base_url,
            page_limit,
            cache_ttl.as_secs()
        );
        Self {
            base_url,
            page_limit,
            cache_ttl,
        }
    }
}

fn env_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> CatalogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_target_production() {
        let config = config_from(&[]);
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.base_url, PRODUCTION_BASE_URL);
        assert_eq!(config.page_limit, 8);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn local_environment_selects_localhost() {
        let config = config_from(&[("ECOVOLT_ENV", "Local")]);
        assert_eq!(config.base_url, LOCAL_BASE_URL);
    }

    #[test]
    fn explicit_url_wins() {
        let config = config_from(&[
            ("ECOVOLT_ENV", "local"),
            ("ECOVOLT_API_URL", "http://staging.internal/api/products"),
        ]);
        assert_eq!(config.base_url, "http://staging.internal/api/products");
    }

    #[test]
    fn limit_is_clamped_and_garbage_ignored() {
        assert_eq!(config_from(&[("ECOVOLT_PAGE_LIMIT", "500")]).page_limit, 50);
        assert_eq!(config_from(&[("ECOVOLT_PAGE_LIMIT", "0")]).page_limit, 1);
        assert_eq!(config_from(&[("ECOVOLT_PAGE_LIMIT", "lots")]).page_limit, 8);
        assert_eq!(
            config_from(&[("ECOVOLT_CACHE_TTL_SECS", "30")]).cache_ttl,
            Duration::from_secs(30)
        );
    }
}
