use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "data")]
pub enum PushOperation {
    GetToken,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PushError {
    #[error("push notifications not available on this platform")]
    NotAvailable,

    #[error("token fetch failed: {message}")]
    FetchFailed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum PushOutput {
    Token(Option<String>),
}

impl PushOutput {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Token(Some(token)) if !token.is_empty() => Some(token),
            Self::Token(_) => None,
        }
    }
}

pub type PushResult = Result<PushOutput, PushError>;

impl Operation for PushOperation {
    type Output = PushResult;
}

/// Registration-token access on the push transport. Message delivery and
/// token rotation arrive as events instead.
#[derive(Capability)]
pub struct Push<Ev> {
    context: CapabilityContext<PushOperation, Ev>,
}

impl<Ev> Push<Ev> {
    pub fn new(context: CapabilityContext<PushOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Push<Ev>
where
    Ev: 'static,
{
    /// Fetches the current token; failures and empty tokens map to `None`.
    pub fn fetch_token<F>(&self, make_event: F)
    where
        F: FnOnce(Option<String>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(PushOperation::GetToken).await;
            let token = result.ok().and_then(|o| o.token().map(str::to_string));
            ctx.update_app(make_event(token));
        });
    }
}
