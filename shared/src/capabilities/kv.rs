use crux_kv::KeyValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_TOKEN_BYTES: usize = 4096;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value too large: {size} bytes exceeds maximum of {max} bytes")]
    ValueTooLarge { size: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyNamespace {
    Push,
}

impl KeyNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            KeyNamespace::Push => "push",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KvKey {
    namespace: KeyNamespace,
    key: String,
}

impl KvKey {
    pub fn new(namespace: KeyNamespace, key: impl Into<String>) -> Result<Self, KvError> {
        let key = key.into();
        Self::validate_key(&key)?;
        Ok(Self { namespace, key })
    }

    pub fn raw(&self) -> String {
        format!("{}:{}", self.namespace.prefix(), self.key)
    }

    fn validate_key(key: &str) -> Result<(), KvError> {
        let invalid = |reason: &str| KvError::InvalidKey {
            key: key.chars().take(50).collect(),
            reason: reason.to_string(),
        };

        if key.trim().is_empty() {
            return Err(invalid("key cannot be empty"));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(invalid("key exceeds maximum length"));
        }
        if key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(invalid("key cannot contain path segments"));
        }
        if key.chars().any(char::is_control) {
            return Err(invalid("key contains control characters"));
        }
        Ok(())
    }
}

/// The single durable value this core owns: the last push registration token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTokenStore {
    key: KvKey,
}

impl PushTokenStore {
    pub fn new(key: &str) -> Result<Self, KvError> {
        Ok(Self {
            key: KvKey::new(KeyNamespace::Push, key)?,
        })
    }

    pub fn key(&self) -> &KvKey {
        &self.key
    }

    /// Reads the token. Missing, unreadable or non-UTF-8 values all read as
    /// `None`.
    pub fn load<Ev, F>(&self, kv: &KeyValue<Ev>, make_event: F)
    where
        Ev: 'static,
        F: FnOnce(Option<String>) -> Ev + Send + Sync + 'static,
    {
        kv.get(self.key.raw(), move |result| {
            let token = match result {
                Ok(value) => value.and_then(|bytes| String::from_utf8(bytes).ok()),
                Err(e) => {
                    warn!(error = ?e, "cached push token unreadable");
                    None
                }
            };
            make_event(token.filter(|t| !t.is_empty()))
        });
    }

    /// Overwrites the token in place.
    pub fn save<Ev, F>(&self, kv: &KeyValue<Ev>, token: &str, make_event: F) -> Result<(), KvError>
    where
        Ev: 'static,
        F: FnOnce(bool) -> Ev + Send + Sync + 'static,
    {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(KvError::ValueTooLarge {
                size: token.len(),
                max: MAX_TOKEN_BYTES,
            });
        }
        kv.set(self.key.raw(), token.as_bytes().to_vec(), move |result| {
            if let Err(e) = &result {
                warn!(error = ?e, "failed to persist push token");
            }
            make_event(result.is_ok())
        });
        Ok(())
    }
}
