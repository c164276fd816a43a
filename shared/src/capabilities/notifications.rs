use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::notifications::{ChannelSpec, Dispatch, NotificationId, RenderedNotification};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationOperation {
    /// Idempotent on the shell side.
    EnsureChannel(ChannelSpec),
    Notify {
        id: NotificationId,
        notification: RenderedNotification,
    },
}

impl Operation for NotificationOperation {
    type Output = ();
}

#[derive(Capability)]
pub struct Notifications<Ev> {
    context: CapabilityContext<NotificationOperation, Ev>,
}

impl<Ev> Notifications<Ev> {
    pub fn new(context: CapabilityContext<NotificationOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Notifications<Ev>
where
    Ev: 'static,
{
    pub fn ensure_channel(&self, channel: ChannelSpec) {
        self.notify(NotificationOperation::EnsureChannel(channel));
    }

    /// Emits the channel (when needed) strictly before the notification.
    pub fn dispatch(&self, dispatch: Dispatch) {
        let Dispatch {
            ensure_channel,
            record,
            rendered,
        } = dispatch;
        let ctx = self.context.clone();
        self.context.spawn(async move {
            if let Some(channel) = ensure_channel {
                ctx.notify_shell(NotificationOperation::EnsureChannel(channel))
                    .await;
            }
            ctx.notify_shell(NotificationOperation::Notify {
                id: record.id,
                notification: rendered,
            })
            .await;
        });
    }

    fn notify(&self, operation: NotificationOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
