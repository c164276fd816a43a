use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::file_selection::Resolution;

/// Calls into the embedded browsing surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BrowserOperation {
    Load { url: String },
    CanGoBack,
    GoBack,
    /// Completes the page's file chooser continuation. An empty list means
    /// nothing was chosen.
    ResolveFileChooser { resolution: Resolution },
    AnswerGeolocation { origin: String, allow: bool, retain: bool },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BrowserOutput {
    Done,
    History { can_go_back: bool },
}

impl Operation for BrowserOperation {
    type Output = BrowserOutput;
}

#[derive(Capability)]
pub struct Browser<Ev> {
    context: CapabilityContext<BrowserOperation, Ev>,
}

impl<Ev> Browser<Ev> {
    pub fn new(context: CapabilityContext<BrowserOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Browser<Ev>
where
    Ev: 'static,
{
    pub fn load(&self, url: impl Into<String>) {
        self.notify(BrowserOperation::Load { url: url.into() });
    }

    pub fn go_back(&self) {
        self.notify(BrowserOperation::GoBack);
    }

    pub fn can_go_back<F>(&self, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(BrowserOperation::CanGoBack).await;
            let can_go_back = matches!(output, BrowserOutput::History { can_go_back: true });
            ctx.update_app(make_event(can_go_back));
        });
    }

    pub fn resolve_file_chooser(&self, resolution: Resolution) {
        self.notify(BrowserOperation::ResolveFileChooser { resolution });
    }

    pub fn answer_geolocation(&self, origin: impl Into<String>, allow: bool) {
        self.notify(BrowserOperation::AnswerGeolocation {
            origin: origin.into(),
            allow,
            retain: false,
        });
    }

    fn notify(&self, operation: BrowserOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
