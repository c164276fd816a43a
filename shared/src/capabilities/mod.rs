mod browser;
mod connectivity;
mod file_picker;
mod kv;
mod notifications;
mod permissions;
mod push;
mod system;

pub use self::browser::{Browser, BrowserOperation, BrowserOutput};
pub use self::connectivity::{Connectivity, ConnectivityOperation, ConnectivityOutput};
pub use self::file_picker::{FilePicker, FilePickerOperation};
pub use self::kv::{KeyNamespace, KvError, KvKey, PushTokenStore};
pub use self::notifications::{NotificationOperation, Notifications};
pub use self::permissions::{PermissionOperation, PermissionOutput, Permissions};
pub use self::push::{Push, PushError, PushOperation, PushOutput, PushResult};
pub use self::system::{System, SystemOperation, SystemOutput};

// Crux's built-in Render covers view updates; no custom render capability.
pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub kv: KeyValue<Event>,
    pub browser: Browser<Event>,
    pub connectivity: Connectivity<Event>,
    pub permissions: Permissions<Event>,
    pub file_picker: FilePicker<Event>,
    pub notifications: Notifications<Event>,
    pub system: System<Event>,
    pub push: Push<Event>,
}
