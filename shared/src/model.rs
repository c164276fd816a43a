use serde::{Deserialize, Serialize};

use crate::battery::BatteryPrompter;
use crate::config::ShellConfig;
use crate::file_selection::FileSelectionBroker;
use crate::navigation::{NavigationController, Page};
use crate::notifications::NotificationDispatcher;
use crate::permissions::PermissionNegotiator;

/// Whether an OS facility exists on this device. Resolved once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    Supported,
    #[default]
    Unsupported,
}

impl Support {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Supported)
    }
}

impl From<bool> for Support {
    fn from(supported: bool) -> Self {
        if supported {
            Self::Supported
        } else {
            Self::Unsupported
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaPermissionModel {
    /// Per-type media permissions (Android 13+).
    #[default]
    Granular,
    /// A single storage permission.
    Legacy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformProfile {
    pub notification_permission: Support,
    pub battery_optimization: Support,
    pub media_permissions: MediaPermissionModel,
    pub manufacturer: String,
}

/// Back-press bookkeeping for "press again to exit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackPress {
    pub last_unconsumed_ms: Option<u64>,
}

impl BackPress {
    /// Returns true when this press should exit the shell.
    pub fn press(&mut self, now_ms: u64, window_ms: u64) -> bool {
        match self.last_unconsumed_ms {
            Some(last) if now_ms.saturating_sub(last) < window_ms => {
                self.last_unconsumed_ms = None;
                true
            }
            _ => {
                self.last_unconsumed_ms = Some(now_ms);
                false
            }
        }
    }
}

/// Core state. Each field is owned and mutated by exactly one component.
#[derive(Debug, Default)]
pub struct Model {
    pub config: ShellConfig,
    pub platform: PlatformProfile,
    pub started: bool,

    pub navigation: NavigationController,
    pub permissions: PermissionNegotiator,
    pub files: FileSelectionBroker,
    pub notifications: NotificationDispatcher,
    pub battery: BatteryPrompter,
    pub back: BackPress,

    /// Empty until the transport or storage supplied a token.
    pub cached_push_token: String,
    pub launch_deep_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub page: Page,
    pub page_url: String,
    pub battery_optimization_exempt: bool,
    pub cached_push_token: String,
    pub launch_deep_link: Option<String>,
    pub file_request_pending: bool,
}
