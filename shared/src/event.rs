use serde::{Deserialize, Serialize};

use crate::battery::RationaleChoice;
use crate::bridge::BridgeCall;
use crate::config::ShellConfig;
use crate::file_selection::{FileRequestId, PickerResult};
use crate::model::PlatformProfile;
use crate::navigation::NavTrigger;
use crate::notifications::RemoteMessage;
use crate::permissions::{CorrelationCode, PermissionGrant};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Startup {
    /// `None` keeps the built-in defaults.
    #[serde(default)]
    pub config: Option<ShellConfig>,
    #[serde(default)]
    pub platform: PlatformProfile,
    /// Deep link carried by the notification that launched the shell.
    #[serde(default)]
    pub deep_link: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    Started(Box<Startup>),
    Resumed,
    WindowFocusChanged { has_focus: bool },
    NotificationOpened { deep_link: Option<String> },
    BackPressed { now_ms: u64 },
    Destroyed,
}

/// Chrome-level callbacks registered on the browsing surface.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum BrowserEvent {
    FileChooserRequested { request: FileRequestId },
    GeolocationPromptRequested { origin: String },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkEvent {
    Available,
    Lost,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum PushEvent {
    TokenRefreshed { token: String },
    MessageReceived(Box<RemoteMessage>),
}

/// Why a connectivity snapshot was taken.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityReason {
    SplashFinished,
    /// `generation` is the monitor generation when the snapshot was requested.
    Retry { generation: u64 },
}

impl ConnectivityReason {
    #[must_use]
    pub fn trigger(self, online: bool) -> NavTrigger {
        match self {
            Self::SplashFinished => NavTrigger::SplashFinished { online },
            Self::Retry { generation } => NavTrigger::Retry { online, generation },
        }
    }
}

/// Why a permission grant status was checked.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum CheckPurpose {
    StartupNotifications,
    LocationRequest,
    Geolocation { origin: String },
    FileSelection { request: FileRequestId },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Shell-originated
    Lifecycle(LifecycleEvent),
    Bridge(BridgeCall),
    Browser(BrowserEvent),
    Network(NetworkEvent),
    PermissionResult {
        code: CorrelationCode,
        grants: Vec<PermissionGrant>,
    },
    Push(PushEvent),

    // Capability responses
    #[serde(skip)]
    ConnectivityChecked {
        reason: ConnectivityReason,
        online: bool,
    },
    #[serde(skip)]
    PermissionChecked { purpose: CheckPurpose, granted: bool },
    #[serde(skip)]
    PickerFinished {
        request: FileRequestId,
        result: PickerResult,
    },
    #[serde(skip)]
    HistoryChecked { can_go_back: bool, now_ms: u64 },
    #[serde(skip)]
    BatteryExemptionQueried { exempt: bool },
    #[serde(skip)]
    RationaleAnswered { choice: RationaleChoice },
    #[serde(skip)]
    TokenFetched { token: Option<String> },
    #[serde(skip)]
    CachedTokenLoaded { token: Option<String> },
    #[serde(skip)]
    TokenPersisted { ok: bool },
}

impl Event {
    /// Variant name for logging; payloads can carry tokens and user text.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lifecycle(LifecycleEvent::Started(_)) => "started",
            Self::Lifecycle(LifecycleEvent::Resumed) => "resumed",
            Self::Lifecycle(LifecycleEvent::WindowFocusChanged { .. }) => "window_focus_changed",
            Self::Lifecycle(LifecycleEvent::NotificationOpened { .. }) => "notification_opened",
            Self::Lifecycle(LifecycleEvent::BackPressed { .. }) => "back_pressed",
            Self::Lifecycle(LifecycleEvent::Destroyed) => "destroyed",
            Self::Bridge(_) => "bridge_call",
            Self::Browser(BrowserEvent::FileChooserRequested { .. }) => "file_chooser_requested",
            Self::Browser(BrowserEvent::GeolocationPromptRequested { .. }) => "geolocation_prompt",
            Self::Network(NetworkEvent::Available) => "network_available",
            Self::Network(NetworkEvent::Lost) => "network_lost",
            Self::PermissionResult { .. } => "permission_result",
            Self::Push(PushEvent::TokenRefreshed { .. }) => "push_token_refreshed",
            Self::Push(PushEvent::MessageReceived(_)) => "push_message",
            Self::ConnectivityChecked { .. } => "connectivity_checked",
            Self::PermissionChecked { .. } => "permission_checked",
            Self::PickerFinished { .. } => "picker_finished",
            Self::HistoryChecked { .. } => "history_checked",
            Self::BatteryExemptionQueried { .. } => "battery_exemption_queried",
            Self::RationaleAnswered { .. } => "rationale_answered",
            Self::TokenFetched { .. } => "token_fetched",
            Self::CachedTokenLoaded { .. } => "cached_token_loaded",
            Self::TokenPersisted { .. } => "token_persisted",
        }
    }
}
