//! Page state machine for the browsing surface.
//!
//! The controller is the only writer of the current [`Page`]. Every input,
//! whether a bridge call or a connectivity callback, is reduced to a
//! [`NavTrigger`] and fed through [`NavigationController::evaluate`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ShellConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    #[default]
    IntroSplash,
    LiveApp,
    OfflineFallback,
}

impl Page {
    #[must_use]
    pub fn url(self, config: &ShellConfig) -> &str {
        match self {
            Self::IntroSplash => &config.intro_url,
            Self::LiveApp => &config.live_url,
            Self::OfflineFallback => &config.offline_url,
        }
    }

    const fn for_connectivity(online: bool) -> Self {
        if online {
            Self::LiveApp
        } else {
            Self::OfflineFallback
        }
    }
}

/// Inputs to the page state machine. Bridge triggers carry the connectivity
/// observed when they were evaluated. A retry also carries the monitor
/// generation current when its snapshot was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTrigger {
    SplashFinished { online: bool },
    Retry { online: bool, generation: u64 },
    NetworkAvailable,
    NetworkLost,
}

impl NavTrigger {
    const fn is_connectivity_callback(self) -> bool {
        matches!(self, Self::NetworkAvailable | Self::NetworkLost)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subscription {
    /// Splash has not finished; connectivity callbacks are not wanted yet.
    #[default]
    Dormant,
    Armed,
    TornDown,
}

/// A decided page load. Self-transitions are reported too: the page is
/// reloaded even though its identity does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Page,
    pub to: Page,
    pub arm_subscription: bool,
}

impl Transition {
    #[must_use]
    pub fn is_reload(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationController {
    page: Page,
    subscription: Subscription,
    /// Bumped by every monitor callback.
    generation: u64,
}

impl NavigationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Tag for a connectivity snapshot requested now. A snapshot answered
    /// after a newer monitor callback is stale.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.subscription == Subscription::Armed
    }

    /// Applies one trigger. Returns the page to load, or `None` when the
    /// trigger has no effect in the current state.
    pub fn evaluate(&mut self, trigger: NavTrigger) -> Option<Transition> {
        if trigger.is_connectivity_callback() {
            self.generation += 1;
        }
        if trigger.is_connectivity_callback() && !self.is_armed() {
            debug!(?trigger, page = ?self.page, "connectivity callback before subscription, ignored");
            return None;
        }

        if let NavTrigger::Retry { generation, .. } = trigger {
            if generation < self.generation {
                debug!(
                    ?trigger,
                    current = self.generation,
                    "retry snapshot older than last monitor callback, dropped"
                );
                return None;
            }
        }

        let from = self.page;
        let to = match (from, trigger) {
            (Page::IntroSplash, NavTrigger::SplashFinished { online }) => {
                Page::for_connectivity(online)
            }
            (Page::OfflineFallback, NavTrigger::Retry { online, .. }) => {
                Page::for_connectivity(online)
            }
            (Page::LiveApp, NavTrigger::Retry { online: true, .. }) => Page::LiveApp,
            (Page::OfflineFallback, NavTrigger::NetworkAvailable) => Page::LiveApp,
            (Page::LiveApp, NavTrigger::NetworkLost) => Page::OfflineFallback,
            _ => {
                debug!(?trigger, page = ?from, "no transition");
                return None;
            }
        };

        let arm_subscription = matches!(trigger, NavTrigger::SplashFinished { .. })
            && self.subscription == Subscription::Dormant;
        if arm_subscription {
            self.subscription = Subscription::Armed;
        }

        self.page = to;
        info!(?from, ?to, ?trigger, "page transition");

        Some(Transition {
            from,
            to,
            arm_subscription,
        })
    }

    /// Returns true when a live subscription has to be cancelled.
    pub fn tear_down(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.subscription = Subscription::TornDown;
        was_armed
    }
}
