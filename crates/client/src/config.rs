//! Deployment configuration.
//!
//! Defaults come from `config.json` (embedded at build time). Each value can be
//! overridden by an environment variable: on desktop the process environment is
//! read at startup, on the web the variables are captured when the bundle is
//! compiled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_CONFIG: &str = include_str!("../config.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Identity provider (Cognito user pool) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdentityConfig {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub user_pool_id: String,
    #[serde(default)]
    pub client_id: String,
    /// Overrides the regional endpoint. Used for local identity emulators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl IdentityConfig {
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://cognito-idp.{}.amazonaws.com", self.region),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketUrls {
    #[serde(default)]
    pub assistant: String,
    #[serde(default)]
    pub course_creator: String,
    #[serde(default)]
    pub qa: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub websockets: WebSocketUrls,
    #[serde(default = "default_articles_url")]
    pub articles_url: String,
}

fn default_articles_url() -> String {
    "https://dev.to/api/articles?top=7&per_page=6".to_string()
}

/// Environment variables that override config values.
pub const ENV_OVERRIDES: &[&str] = &[
    "SPACEDASH_API_URL",
    "SPACEDASH_REGION",
    "SPACEDASH_USER_POOL_ID",
    "SPACEDASH_CLIENT_ID",
    "SPACEDASH_IDENTITY_ENDPOINT",
    "SPACEDASH_ASSISTANT_WS_URL",
    "SPACEDASH_COURSE_WS_URL",
    "SPACEDASH_QA_WS_URL",
    "SPACEDASH_ARTICLES_URL",
];

impl AppConfig {
    /// Embedded defaults plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_json(EMBEDDED_CONFIG)?;
        config.apply_overrides(env_override);
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SPACEDASH_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = get("SPACEDASH_REGION") {
            self.identity.region = v;
        }
        if let Some(v) = get("SPACEDASH_USER_POOL_ID") {
            self.identity.user_pool_id = v;
        }
        if let Some(v) = get("SPACEDASH_CLIENT_ID") {
            self.identity.client_id = v;
        }
        if let Some(v) = get("SPACEDASH_IDENTITY_ENDPOINT") {
            self.identity.endpoint = Some(v);
        }
        if let Some(v) = get("SPACEDASH_ASSISTANT_WS_URL") {
            self.websockets.assistant = v;
        }
        if let Some(v) = get("SPACEDASH_COURSE_WS_URL") {
            self.websockets.course_creator = v;
        }
        if let Some(v) = get("SPACEDASH_QA_WS_URL") {
            self.websockets.qa = v;
        }
        if let Some(v) = get("SPACEDASH_ARTICLES_URL") {
            self.articles_url = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Missing("apiBaseUrl"));
        }
        url::Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::InvalidValue("apiBaseUrl", e.to_string()))?;
        if self.identity.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("identity.clientId"));
        }
        if self.identity.endpoint.is_none() && self.identity.region.trim().is_empty() {
            return Err(ConfigError::Missing("identity.region"));
        }
        for (name, ws_url) in [
            ("websockets.assistant", &self.websockets.assistant),
            ("websockets.courseCreator", &self.websockets.course_creator),
            ("websockets.qa", &self.websockets.qa),
        ] {
            if ws_url.is_empty() {
                continue;
            }
            if !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://")) {
                return Err(ConfigError::InvalidValue(name, ws_url.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(target_arch = "wasm32")]
fn env_override(key: &str) -> Option<String> {
    let value = match key {
        "SPACEDASH_API_URL" => option_env!("SPACEDASH_API_URL"),
        "SPACEDASH_REGION" => option_env!("SPACEDASH_REGION"),
        "SPACEDASH_USER_POOL_ID" => option_env!("SPACEDASH_USER_POOL_ID"),
        "SPACEDASH_CLIENT_ID" => option_env!("SPACEDASH_CLIENT_ID"),
        "SPACEDASH_IDENTITY_ENDPOINT" => option_env!("SPACEDASH_IDENTITY_ENDPOINT"),
        "SPACEDASH_ASSISTANT_WS_URL" => option_env!("SPACEDASH_ASSISTANT_WS_URL"),
        "SPACEDASH_COURSE_WS_URL" => option_env!("SPACEDASH_COURSE_WS_URL"),
        "SPACEDASH_QA_WS_URL" => option_env!("SPACEDASH_QA_WS_URL"),
        "SPACEDASH_ARTICLES_URL" => option_env!("SPACEDASH_ARTICLES_URL"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn embedded_config_is_valid() {
        let config = AppConfig::from_json(EMBEDDED_CONFIG).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn overrides_replace_values_and_skip_blanks() {
        let mut config = AppConfig::from_json(EMBEDDED_CONFIG).unwrap();
        let original_qa = config.websockets.qa.clone();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SPACEDASH_API_URL", "http://localhost:9000"),
            ("SPACEDASH_CLIENT_ID", "local-client"),
            ("SPACEDASH_QA_WS_URL", "   "),
        ]);

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://localhost:9000");
        assert_eq!(config.identity.client_id, "local-client");
        assert_eq!(config.websockets.qa, original_qa);
    }

    #[test]
    fn validation_rejects_missing_and_malformed_values() {
        let config = AppConfig::from_json(
            r#"{"apiBaseUrl": "", "identity": {"clientId": "x", "region": "eu-west-1"}}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("apiBaseUrl"))));

        let config = AppConfig::from_json(
            r#"{
                "apiBaseUrl": "https://api.example.com",
                "identity": {"clientId": "x", "region": "eu-west-1"},
                "websockets": {"assistant": "https://not-a-socket"}
            }"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue("websockets.assistant", _))
        ));
    }

    #[test]
    fn identity_endpoint_defaults_to_region() {
        let identity = IdentityConfig {
            region: "us-east-1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            identity.endpoint_url(),
            "https://cognito-idp.us-east-1.amazonaws.com"
        );
    }
}
