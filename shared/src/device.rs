//! Manufacturer-specific behaviour.

use serde::{Deserialize, Serialize};

/// ROMs that drop navigation input when the navigation bar is hidden.
const NAV_BAR_SENSITIVE: &[&str] = &[
    "vivo", "xiaomi", "redmi", "oppo", "realme", "samsung", "tecno", "infinix", "itel",
];

/// ROMs that kill background work unless the user also changes per-app
/// battery settings by hand.
const AGGRESSIVE_BATTERY: &[&str] = &["xiaomi", "redmi", "oppo", "realme", "vivo", "oneplus"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemBars {
    StatusOnly,
    All,
}

fn matches_any(manufacturer: &str, list: &[&str]) -> bool {
    let manufacturer = manufacturer.to_lowercase();
    list.iter().any(|name| manufacturer.contains(name))
}

/// Which system bars to hide when the window gains focus.
#[must_use]
pub fn bars_to_hide(manufacturer: &str) -> SystemBars {
    if matches_any(manufacturer, NAV_BAR_SENSITIVE) {
        SystemBars::StatusOnly
    } else {
        SystemBars::All
    }
}

#[must_use]
pub fn needs_manual_battery_steps(manufacturer: &str) -> bool {
    matches_any(manufacturer, AGGRESSIVE_BATTERY)
}
