use directories::BaseDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Connection settings for the EchoMind API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("EchoMind token missing. Set ECHOMIND_TOKEN or api.token in echomind.yaml.")]
    Missing,
    #[error("EchoMind configuration invalid: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Missing => {
                "EchoMind token missing. Set ECHOMIND_TOKEN or api.token in echomind.yaml."
                    .to_string()
            }
            Self::Invalid(detail) => {
                format!("EchoMind not configured: {detail}. Update echomind.yaml.")
            }
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl ClientSettings {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api/v1";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Resolve settings from `.env`, the process environment and `echomind.yaml`.
    /// Environment values win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let file = match locate_config_file() {
            Some(path) => Some(read_config_file(&path)?),
            None => None,
        };
        let env = EnvOverrides {
            base_url: std::env::var("ECHOMIND_API_URL").ok(),
            token: std::env::var("ECHOMIND_TOKEN").ok(),
            timeout_secs: std::env::var("ECHOMIND_TIMEOUT_SECS").ok(),
        };
        resolve_settings(file.and_then(|config| config.api), env)
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::Missing)
    }

    /// Load settings from one explicit YAML file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = read_config_file(path)?;
        let api = config
            .api
            .ok_or_else(|| ConfigError::Invalid("missing `api` section".to_string()))?;
        resolve_settings(Some(api), EnvOverrides::default())
    }
}

#[derive(Debug, Default)]
struct EnvOverrides {
    base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<String>,
}

fn resolve_settings(
    api: Option<ApiSection>,
    env: EnvOverrides,
) -> Result<ClientSettings, ConfigError> {
    let api = api.unwrap_or_default();

    let base_url = non_empty(env.base_url)
        .or_else(|| non_empty(api.base_url))
        .unwrap_or_else(|| ClientSettings::DEFAULT_BASE_URL.to_string());
    let parsed = Url::parse(&base_url)
        .map_err(|err| ConfigError::Invalid(format!("invalid base_url `{base_url}`: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "base_url `{base_url}` must use http or https"
        )));
    }

    let timeout_secs = match non_empty(env.timeout_secs) {
        Some(raw) => raw.parse::<u64>().map_err(|err| {
            ConfigError::Invalid(format!("invalid ECHOMIND_TIMEOUT_SECS `{raw}`: {err}"))
        })?,
        None => api
            .timeout_secs
            .unwrap_or(ClientSettings::DEFAULT_TIMEOUT.as_secs()),
    };
    if timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(ClientSettings {
        base_url: base_url.trim_end_matches('/').to_string(),
        token: non_empty(env.token).or_else(|| non_empty(api.token)),
        timeout: Duration::from_secs(timeout_secs),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_config_file(path: &Path) -> Result<EchomindConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        ConfigError::Invalid(format!("failed to read {}: {err}", path.display()))
    })?;
    serde_yaml::from_str(&contents)
        .map_err(|err| ConfigError::Invalid(format!("invalid {}: {err}", path.display())))
}

fn locate_config_file() -> Option<PathBuf> {
    echomind_yaml_candidates()
        .into_iter()
        .find(|path| path.exists())
}

fn echomind_yaml_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(base) = BaseDirs::new() {
        let config_dir = base.config_dir().join("echomind");
        paths.push(config_dir.join("echomind.yaml"));
        paths.push(config_dir.join("echomind.yml"));
        let home_dir = base.home_dir();
        paths.push(home_dir.join(".echomind").join("echomind.yaml"));
        paths.push(home_dir.join(".echomind").join("echomind.yml"));
    }
    paths.push(PathBuf::from("echomind.yaml"));
    paths.push(PathBuf::from("echomind.yml"));
    paths
}

#[derive(Debug, Deserialize)]
struct EchomindConfig {
    api: Option<ApiSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}
