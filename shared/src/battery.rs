//! Background-execution exemption prompting.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{BatteryPromptPolicy, ShellConfig};
use crate::device;
use crate::model::Support;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rationale {
    pub title: String,
    pub message: String,
    pub allow_label: String,
    pub dismiss_label: String,
}

impl Rationale {
    #[must_use]
    pub fn build(config: &ShellConfig, manufacturer: &str) -> Self {
        let app = &config.app_name;
        let mut message = format!(
            "{app} needs to run in the background to deliver job alerts when the app is closed.\n\n\
             Tap \"Allow\" to disable battery optimisation for {app}."
        );
        if device::needs_manual_battery_steps(manufacturer) {
            message.push_str(&format!(
                "\n\n\u{26a0}\u{fe0f} {manufacturer} devices also require:\n\
                 Settings \u{2192} Apps \u{2192} {app} \u{2192} Battery \u{2192} No restrictions"
            ));
        }
        Self {
            title: "\u{1f514} Enable Background Notifications".to_string(),
            message,
            allow_label: "Allow".to_string(),
            dismiss_label: "Not Now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RationaleChoice {
    Allow,
    NotNow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatteryPrompter {
    policy: BatteryPromptPolicy,
    exempt: Option<bool>,
    prompted: bool,
    prompt_open: bool,
}

impl BatteryPrompter {
    #[must_use]
    pub fn new(policy: BatteryPromptPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Last observed exemption. Unknown and unsupported both answer `false`.
    #[must_use]
    pub fn is_exempt(&self, support: Support) -> bool {
        support.is_supported() && self.exempt.unwrap_or(false)
    }

    /// Whether a resume should query the current exemption at all.
    #[must_use]
    pub fn should_check(&self, support: Support) -> bool {
        support.is_supported() && !self.prompt_open
    }

    /// Records the queried state and decides whether to show the rationale.
    pub fn exemption_observed(&mut self, exempt: bool) -> bool {
        self.exempt = Some(exempt);
        if exempt || self.prompt_open {
            return false;
        }
        let allowed = match self.policy {
            BatteryPromptPolicy::AlwaysUntilGranted => true,
            BatteryPromptPolicy::AskOnce => !self.prompted,
        };
        if allowed {
            self.prompted = true;
            self.prompt_open = true;
        } else {
            debug!("battery rationale already shown once, skipping");
        }
        allowed
    }

    /// Returns true when the exemption settings surface should open.
    pub fn answered(&mut self, choice: RationaleChoice) -> bool {
        self.prompt_open = false;
        choice == RationaleChoice::Allow && self.exempt != Some(true)
    }
}
