use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::permissions::{CorrelationCode, Permission};

/// The OS answer to `Request` comes back later as a permission-result event
/// carrying the same correlation code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionOperation {
    Check { permission: Permission },
    Request { permissions: Vec<Permission>, code: CorrelationCode },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PermissionOutput {
    Done,
    Granted(bool),
}

impl Operation for PermissionOperation {
    type Output = PermissionOutput;
}

#[derive(Capability)]
pub struct Permissions<Ev> {
    context: CapabilityContext<PermissionOperation, Ev>,
}

impl<Ev> Permissions<Ev> {
    pub fn new(context: CapabilityContext<PermissionOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Permissions<Ev>
where
    Ev: 'static,
{
    pub fn check<F>(&self, permission: Permission, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(PermissionOperation::Check { permission })
                .await;
            ctx.update_app(make_event(matches!(output, PermissionOutput::Granted(true))));
        });
    }

    pub fn request(&self, permissions: Vec<Permission>, code: CorrelationCode) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(PermissionOperation::Request { permissions, code })
                .await;
        });
    }
}
