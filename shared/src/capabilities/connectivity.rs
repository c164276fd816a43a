use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

/// The OS reachability monitor. Only INTERNET-capable networks count.
/// After `Subscribe` the shell reports transitions as network events, in
/// delivery order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectivityOperation {
    HasInternet,
    Subscribe,
    Unsubscribe,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectivityOutput {
    Done,
    HasInternet(bool),
}

impl Operation for ConnectivityOperation {
    type Output = ConnectivityOutput;
}

#[derive(Capability)]
pub struct Connectivity<Ev> {
    context: CapabilityContext<ConnectivityOperation, Ev>,
}

impl<Ev> Connectivity<Ev> {
    pub fn new(context: CapabilityContext<ConnectivityOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Connectivity<Ev>
where
    Ev: 'static,
{
    pub fn has_internet<F>(&self, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(ConnectivityOperation::HasInternet).await;
            let online = matches!(output, ConnectivityOutput::HasInternet(true));
            ctx.update_app(make_event(online));
        });
    }

    pub fn subscribe(&self) {
        self.notify(ConnectivityOperation::Subscribe);
    }

    pub fn unsubscribe(&self) {
        self.notify(ConnectivityOperation::Unsubscribe);
    }

    fn notify(&self, operation: ConnectivityOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
