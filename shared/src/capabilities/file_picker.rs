use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};

use crate::file_selection::{PickerRequest, PickerResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FilePickerOperation {
    Launch(PickerRequest),
}

impl Operation for FilePickerOperation {
    /// Shells report a missing picker activity as `Failed`.
    type Output = PickerResult;
}

#[derive(Capability)]
pub struct FilePicker<Ev> {
    context: CapabilityContext<FilePickerOperation, Ev>,
}

impl<Ev> FilePicker<Ev> {
    pub fn new(context: CapabilityContext<FilePickerOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> FilePicker<Ev>
where
    Ev: 'static,
{
    pub fn launch<F>(&self, request: PickerRequest, make_event: F)
    where
        F: FnOnce(PickerResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(FilePickerOperation::Launch(request))
                .await;
            ctx.update_app(make_event(result));
        });
    }
}
