use std::{path::PathBuf, time::Duration};

use url::Url;

pub const DEFAULT_API_URL: &str = "https://local-service-finder-backend.onrender.com";
pub const DEFAULT_TOKEN_PATH: &str = ".service-finder/session.json";
pub const DEFAULT_TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub locale: String,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub token_path: PathBuf,
    /// Name the credential token is stored under.
    pub token_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            locale: "en".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default api url is valid"),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("service-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Building AppConfig...");
        let defaults = AppConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = match get("SERVICE_FINDER_API_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                key: "SERVICE_FINDER_API_URL",
                reason: e.to_string(),
            })?,
            None => defaults.api.base_url,
        };

        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "SERVICE_FINDER_API_URL",
                reason: "url cannot be used as a base".to_string(),
            });
        }

        let timeout = parse_secs(get("SERVICE_FINDER_TIMEOUT_SECS"), "SERVICE_FINDER_TIMEOUT_SECS")?
            .unwrap_or(defaults.api.timeout);
        let connect_timeout = parse_secs(
            get("SERVICE_FINDER_CONNECT_TIMEOUT_SECS"),
            "SERVICE_FINDER_CONNECT_TIMEOUT_SECS",
        )?
        .unwrap_or(defaults.api.connect_timeout);

        let config = AppConfig {
            api: ApiConfig {
                base_url,
                timeout,
                connect_timeout,
                user_agent: defaults.api.user_agent,
            },
            storage: StorageConfig {
                token_path: get("SERVICE_FINDER_TOKEN_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.storage.token_path),
                token_key: get("SERVICE_FINDER_TOKEN_KEY").unwrap_or(defaults.storage.token_key),
            },
            locale: get("SERVICE_FINDER_LOCALE").unwrap_or(defaults.locale),
        };
        info!("AppConfig built");

        Ok(config)
    }
}

fn parse_secs(value: Option<String>, key: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let secs = raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("expected whole seconds, got {:?}", raw),
    })?;

    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(Some(Duration::from_secs(secs)))
}
