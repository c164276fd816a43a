use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::battery::{Rationale, RationaleChoice};
use crate::device::SystemBars;

/// OS surfaces outside the browser: settings screens, native dialogs and
/// window chrome. Settings launches are fire-and-forget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SystemOperation {
    OpenLocationSettings,
    OpenBatteryOptimizationSettings,
    QueryBatteryExemption,
    ShowRationale(Rationale),
    ShowToast { text: String },
    HideSystemBars(SystemBars),
    Exit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SystemOutput {
    Done,
    BatteryExempt(bool),
    Choice(RationaleChoice),
}

impl Operation for SystemOperation {
    type Output = SystemOutput;
}

#[derive(Capability)]
pub struct System<Ev> {
    context: CapabilityContext<SystemOperation, Ev>,
}

impl<Ev> System<Ev> {
    pub fn new(context: CapabilityContext<SystemOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> System<Ev>
where
    Ev: 'static,
{
    pub fn open_location_settings(&self) {
        self.notify(SystemOperation::OpenLocationSettings);
    }

    pub fn open_battery_optimization_settings(&self) {
        self.notify(SystemOperation::OpenBatteryOptimizationSettings);
    }

    pub fn show_toast(&self, text: impl Into<String>) {
        self.notify(SystemOperation::ShowToast { text: text.into() });
    }

    pub fn hide_system_bars(&self, bars: SystemBars) {
        self.notify(SystemOperation::HideSystemBars(bars));
    }

    pub fn exit(&self) {
        self.notify(SystemOperation::Exit);
    }

    /// An unexpected answer reads as "not exempt".
    pub fn query_battery_exemption<F>(&self, make_event: F)
    where
        F: FnOnce(bool) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(SystemOperation::QueryBatteryExemption)
                .await;
            ctx.update_app(make_event(matches!(output, SystemOutput::BatteryExempt(true))));
        });
    }

    /// A dismissed or unanswerable dialog counts as "not now".
    pub fn show_rationale<F>(&self, rationale: Rationale, make_event: F)
    where
        F: FnOnce(RationaleChoice) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx
                .request_from_shell(SystemOperation::ShowRationale(rationale))
                .await;
            let choice = match output {
                SystemOutput::Choice(choice) => choice,
                _ => RationaleChoice::NotNow,
            };
            ctx.update_app(make_event(choice));
        });
    }

    fn notify(&self, operation: SystemOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}
