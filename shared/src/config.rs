use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_APP_NAME: &str = "NeedYou";
pub const DEFAULT_LIVE_URL: &str = "https://need-you.xyz/dashboard";
pub const DEFAULT_OFFLINE_URL: &str = "file:///android_asset/offline.html";
pub const DEFAULT_INTRO_URL: &str = "file:///android_asset/splash_intro.html";
pub const DEFAULT_CHANNEL_ID: &str = "needyou_notifications";
pub const DEFAULT_CHANNEL_NAME: &str = "NeedYou Notifications";
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "Job and application alerts from NeedYou";
pub const DEFAULT_NOTIFICATION_ID_BASE: u32 = 1000;
pub const DEFAULT_DEEP_LINK_KEY: &str = "jobId";
pub const DEFAULT_PUSH_TOKEN_KEY: &str = "fcmToken";
pub const DEFAULT_BACK_EXIT_WINDOW_MS: u64 = 2000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),

    #[error("invalid {field} url {value:?}: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

/// How often the background-execution exemption rationale is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryPromptPolicy {
    /// Re-prompt on every resume until the exemption is granted.
    #[default]
    AlwaysUntilGranted,
    /// Prompt at most once per process, respecting "Not now".
    AskOnce,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelImportance {
    Low,
    Default,
    #[default]
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: ChannelImportance,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_CHANNEL_ID.to_string(),
            name: DEFAULT_CHANNEL_NAME.to_string(),
            description: DEFAULT_CHANNEL_DESCRIPTION.to_string(),
            importance: ChannelImportance::High,
        }
    }
}

/// Everything the shell treats as opaque configuration: page locations,
/// notification channel, storage keys and prompt policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub app_name: String,
    pub live_url: String,
    pub offline_url: String,
    pub intro_url: String,
    pub channel: ChannelConfig,
    pub notification_id_base: u32,
    pub deep_link_key: String,
    pub push_token_key: String,
    pub back_exit_window_ms: u64,
    pub battery_prompt: BatteryPromptPolicy,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            live_url: DEFAULT_LIVE_URL.to_string(),
            offline_url: DEFAULT_OFFLINE_URL.to_string(),
            intro_url: DEFAULT_INTRO_URL.to_string(),
            channel: ChannelConfig::default(),
            notification_id_base: DEFAULT_NOTIFICATION_ID_BASE,
            deep_link_key: DEFAULT_DEEP_LINK_KEY.to_string(),
            push_token_key: DEFAULT_PUSH_TOKEN_KEY.to_string(),
            back_exit_window_ms: DEFAULT_BACK_EXIT_WINDOW_MS,
            battery_prompt: BatteryPromptPolicy::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_url("live_url", &self.live_url)?;
        Self::validate_url("offline_url", &self.offline_url)?;
        Self::validate_url("intro_url", &self.intro_url)?;

        if self.channel.id.trim().is_empty() {
            return Err(ConfigError::Empty("channel.id"));
        }
        if self.push_token_key.trim().is_empty() {
            return Err(ConfigError::Empty("push_token_key"));
        }
        Ok(())
    }

    fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
        Url::parse(value)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidUrl {
                field,
                value: value.to_string(),
                reason: e.to_string(),
            })
    }
}
