use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ChannelConfig, ChannelImportance, ShellConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u32);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a notification request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOrigin {
    /// Hosted content saw a new alert while the shell was frontmost.
    Foreground,
    /// The push transport delivered a message while the shell was not frontmost.
    Background,
}

/// Title, body and deep link after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    pub deep_link: Option<String>,
}

impl Alert {
    #[must_use]
    pub fn new(config: &ShellConfig, title: Option<String>, body: Option<String>) -> Self {
        Self {
            title: title.unwrap_or_else(|| config.app_name.clone()),
            body: body.unwrap_or_default(),
            deep_link: None,
        }
    }

    #[must_use]
    pub fn with_deep_link(mut self, deep_link: Option<String>) -> Self {
        self.deep_link = deep_link.filter(|link| !link.is_empty());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNotification {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// A message as delivered by the push transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMessage {
    pub notification: Option<RemoteNotification>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl RemoteMessage {
    /// Non-empty `title`/`body` entries in the data map win over the
    /// notification block, which covers data-only messages.
    #[must_use]
    pub fn into_alert(mut self, config: &ShellConfig) -> Alert {
        let (mut title, mut body) = self
            .notification
            .take()
            .map(|n| (n.title, n.body))
            .unwrap_or_default();

        if let Some(t) = self.data.remove("title").filter(|t| !t.is_empty()) {
            title = Some(t);
        }
        if let Some(b) = self.data.remove("body").filter(|b| !b.is_empty()) {
            body = Some(b);
        }
        let deep_link = self.data.remove(&config.deep_link_key);

        Alert::new(config, title, body).with_deep_link(deep_link)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub deep_link: Option<String>,
    pub origin: DispatchOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: ChannelImportance,
    pub vibrate: bool,
}

impl From<&ChannelConfig> for ChannelSpec {
    fn from(config: &ChannelConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            description: config.description.clone(),
            importance: config.importance,
            vibrate: true,
        }
    }
}

/// What tapping the notification does: reopen the single entry surface,
/// optionally carrying a deep link for the hosted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapTarget {
    pub deep_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNotification {
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub big_text: String,
    pub high_priority: bool,
    pub auto_cancel: bool,
    pub tap: TapTarget,
}

impl RenderedNotification {
    #[must_use]
    pub fn render(record: &NotificationRecord, channel: &ChannelConfig) -> Self {
        Self {
            channel_id: channel.id.clone(),
            title: record.title.clone(),
            body: record.body.clone(),
            big_text: record.body.clone(),
            high_priority: true,
            auto_cancel: true,
            tap: TapTarget {
                deep_link: record.deep_link.clone(),
            },
        }
    }
}

/// Output of one `post`: the channel to create first (if this dispatcher has
/// not created it yet) and the notification to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ensure_channel: Option<ChannelSpec>,
    pub record: NotificationRecord,
    pub rendered: RenderedNotification,
}

/// Owns the notification id counter. Both dispatch origins go through the
/// same instance so ids never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDispatcher {
    next_id: u32,
    issued: u64,
    channel_ensured: bool,
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NOTIFICATION_ID_BASE)
    }
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(id_base: u32) -> Self {
        Self {
            next_id: id_base,
            issued: 0,
            channel_ensured: false,
        }
    }

    /// Moves the counter to a configured base. Refused once any id has been
    /// handed out, since that could reissue a live id.
    pub fn rebase(&mut self, id_base: u32) -> bool {
        if self.issued > 0 {
            warn!(id_base, issued = self.issued, "notification ids already issued, keeping counter");
            return false;
        }
        self.next_id = id_base;
        true
    }

    #[must_use]
    pub fn peek_next_id(&self) -> NotificationId {
        NotificationId(self.next_id)
    }

    /// Returns the channel spec the first time only.
    pub fn ensure_channel(&mut self, channel: &ChannelConfig) -> Option<ChannelSpec> {
        if self.channel_ensured {
            return None;
        }
        self.channel_ensured = true;
        debug!(channel = %channel.id, "notification channel requested");
        Some(ChannelSpec::from(channel))
    }

    pub fn post(&mut self, config: &ShellConfig, origin: DispatchOrigin, alert: Alert) -> Dispatch {
        let ensure_channel = self.ensure_channel(&config.channel);
        let id = self.allocate();

        let record = NotificationRecord {
            id,
            title: alert.title,
            body: alert.body,
            deep_link: alert.deep_link,
            origin,
        };
        let rendered = RenderedNotification::render(&record, &config.channel);
        info!(%id, ?origin, has_deep_link = record.deep_link.is_some(), "notification posted");

        Dispatch {
            ensure_channel,
            record,
            rendered,
        }
    }

    fn allocate(&mut self) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.issued += 1;
        id
    }
}
