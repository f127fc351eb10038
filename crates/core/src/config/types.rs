use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration.
///
/// Every section has defaults, so a missing config file yields a working
/// setup with the keyless providers enabled and the keyed ones disabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Search aggregation configuration: fan-out bounds plus one credential or
/// toggle block per provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Maximum items requested from each provider (default: 12).
    #[serde(default = "default_per_provider_limit")]
    pub per_provider_limit: usize,
    /// HTTP timeout applied to each provider's client (default: 10s).
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    /// Hard deadline per provider task at the aggregator; an elapsed deadline
    /// abandons the task and treats its contribution as empty (default: 15s).
    #[serde(default = "default_overall_deadline")]
    pub overall_deadline_secs: u64,
    #[serde(default)]
    pub jamendo: JamendoConfig,
    #[serde(default)]
    pub soundcloud: SoundcloudConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
    #[serde(default)]
    pub internet_archive: InternetArchiveConfig,
    #[serde(default)]
    pub mixcloud: MixcloudConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            per_provider_limit: default_per_provider_limit(),
            provider_timeout_secs: default_provider_timeout(),
            overall_deadline_secs: default_overall_deadline(),
            jamendo: JamendoConfig::default(),
            soundcloud: SoundcloudConfig::default(),
            youtube: YoutubeConfig::default(),
            internet_archive: InternetArchiveConfig::default(),
            mixcloud: MixcloudConfig::default(),
        }
    }
}

fn default_per_provider_limit() -> usize {
    12
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_overall_deadline() -> u64 {
    15
}

/// Jamendo (royalty-free catalog). Disabled without a client id.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JamendoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Base URL override (default: https://api.jamendo.com/v3.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// SoundCloud. Works without a configured client id by rotating through a
/// built-in list of public ids.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SoundcloudConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Base URL override (default: https://api-v2.soundcloud.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// YouTube Data API v3. Disabled without an API key.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct YoutubeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (default: https://www.googleapis.com/youtube/v3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Internet Archive. Keyless; enabled by default.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InternetArchiveConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL override (default: https://archive.org).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for InternetArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

/// Mixcloud. Keyless; enabled by default.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MixcloudConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base URL override (default: https://api.mixcloud.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for MixcloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Sanitized config for API responses (credentials redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub search: SanitizedSearchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSearchConfig {
    pub per_provider_limit: usize,
    pub provider_timeout_secs: u64,
    pub overall_deadline_secs: u64,
    pub jamendo_client_id_configured: bool,
    pub soundcloud_client_id_configured: bool,
    pub youtube_api_key_configured: bool,
    pub internet_archive_enabled: bool,
    pub mixcloud_enabled: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let search = &config.search;
        Self {
            server: config.server.clone(),
            search: SanitizedSearchConfig {
                per_provider_limit: search.per_provider_limit,
                provider_timeout_secs: search.provider_timeout_secs,
                overall_deadline_secs: search.overall_deadline_secs,
                jamendo_client_id_configured: search.jamendo.client_id.is_some(),
                soundcloud_client_id_configured: search.soundcloud.client_id.is_some(),
                youtube_api_key_configured: search.youtube.api_key.is_some(),
                internet_archive_enabled: search.internet_archive.enabled,
                mixcloud_enabled: search.mixcloud.enabled,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.per_provider_limit, 12);
        assert_eq!(config.search.provider_timeout_secs, 10);
        assert!(config.search.internet_archive.enabled);
        assert!(config.search.mixcloud.enabled);
        assert!(config.search.youtube.api_key.is_none());
        assert!(config.search.jamendo.client_id.is_none());
    }

    #[test]
    fn test_deserialize_with_credentials() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[search]
per_provider_limit = 5

[search.youtube]
api_key = "yt-key"

[search.jamendo]
client_id = "jam-id"

[search.mixcloud]
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.search.per_provider_limit, 5);
        assert_eq!(config.search.youtube.api_key.as_deref(), Some("yt-key"));
        assert_eq!(config.search.jamendo.client_id.as_deref(), Some("jam-id"));
        assert!(!config.search.mixcloud.enabled);
        assert!(config.search.internet_archive.enabled);
    }

    #[test]
    fn test_sanitized_config_redacts_credentials() {
        let mut config = Config::default();
        config.search.youtube.api_key = Some("secret".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.search.youtube_api_key_configured);
        assert!(!sanitized.search.jamendo_client_id_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }
}
