//! The capability surface offered to hosted web content.
//!
//! Calls ([`BridgeCall`]) become core events and never answer directly.
//! Queries ([`BridgeQuery`]) are synchronous reads answered from the current
//! [`ViewModel`] without side effects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::ViewModel;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("bridge invocation is not valid JSON: {0}")]
    Malformed(String),

    #[error("bridge invocation has no method name")]
    MissingMethod,

    #[error("unknown bridge method: {0}")]
    UnknownMethod(String),

    #[error("invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum BridgeCall {
    Retry,
    SplashIntroFinished,
    ShowForegroundNotification {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        body: Option<String>,
    },
    RequestLocationPermission,
    OpenLocationSettings,
    OpenBatteryOptimizationSettings,
    AcknowledgeDeepLink,
}

const CALL_METHODS: &[&str] = &[
    "retry",
    "splashIntroFinished",
    "showForegroundNotification",
    "requestLocationPermission",
    "openLocationSettings",
    "openBatteryOptimizationSettings",
    "acknowledgeDeepLink",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args", rename_all = "camelCase")]
pub enum BridgeQuery {
    IsBatteryOptimizationExempt,
    GetCachedPushToken,
    GetLaunchDeepLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BridgeAnswer {
    Bool(bool),
    Text(String),
}

impl BridgeQuery {
    /// Empty strings mean "not available yet", never an error.
    #[must_use]
    pub fn answer(self, view: &ViewModel) -> BridgeAnswer {
        match self {
            Self::IsBatteryOptimizationExempt => BridgeAnswer::Bool(view.battery_optimization_exempt),
            Self::GetCachedPushToken => BridgeAnswer::Text(view.cached_push_token.clone()),
            Self::GetLaunchDeepLink => {
                BridgeAnswer::Text(view.launch_deep_link.clone().unwrap_or_default())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeInvocation {
    Call(BridgeCall),
    Query(BridgeQuery),
}

/// Decodes `{"method": "...", "args": {...}}` as sent by hosted content.
/// A missing, `null` or empty `args` means "no arguments" for every method.
pub fn decode(json: &str) -> Result<BridgeInvocation, BridgeError> {
    let mut value: Value =
        serde_json::from_str(json).map_err(|e| BridgeError::Malformed(e.to_string()))?;
    let method = value
        .get("method")
        .and_then(Value::as_str)
        .ok_or(BridgeError::MissingMethod)?
        .to_string();
    let no_args = strip_empty_args(&mut value);

    if let Ok(query) = serde_json::from_value::<BridgeQuery>(value.clone()) {
        return Ok(BridgeInvocation::Query(query));
    }

    let call = serde_json::from_value::<BridgeCall>(value.clone()).or_else(|e| {
        if no_args {
            // Calls with optional fields still need an object to default from.
            value["args"] = Value::Object(Map::new());
            serde_json::from_value::<BridgeCall>(value)
        } else {
            Err(e)
        }
    });

    match call {
        Ok(call) => Ok(BridgeInvocation::Call(call)),
        Err(e) if CALL_METHODS.contains(&method.as_str()) => Err(BridgeError::InvalidArguments {
            method,
            reason: e.to_string(),
        }),
        Err(_) => Err(BridgeError::UnknownMethod(method)),
    }
}

/// Removes an absent-equivalent `args` entry. Returns true when the
/// invocation carries no arguments.
fn strip_empty_args(value: &mut Value) -> bool {
    let Some(object) = value.as_object_mut() else {
        return false;
    };
    let empty = match object.get("args") {
        None | Some(Value::Null) => true,
        Some(Value::Object(args)) => args.is_empty(),
        Some(_) => false,
    };
    if empty {
        object.remove("args");
    }
    empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Page;

    fn view() -> ViewModel {
        ViewModel {
            page: Page::LiveApp,
            page_url: String::new(),
            battery_optimization_exempt: true,
            cached_push_token: "tok".into(),
            launch_deep_link: None,
            file_request_pending: false,
        }
    }

    #[test]
    fn decodes_unit_calls() {
        assert_eq!(
            decode(r#"{"method":"retry"}"#).unwrap(),
            BridgeInvocation::Call(BridgeCall::Retry)
        );
        assert_eq!(
            decode(r#"{"method":"splashIntroFinished"}"#).unwrap(),
            BridgeInvocation::Call(BridgeCall::SplashIntroFinished)
        );
    }

    #[test]
    fn decodes_notification_arguments() {
        let call = decode(
            r#"{"method":"showForegroundNotification","args":{"title":"New job","body":"Near you"}}"#,
        )
        .unwrap();
        assert_eq!(
            call,
            BridgeInvocation::Call(BridgeCall::ShowForegroundNotification {
                title: Some("New job".into()),
                body: Some("Near you".into()),
            })
        );
    }

    #[test]
    fn notification_arguments_may_be_partial() {
        let call =
            decode(r#"{"method":"showForegroundNotification","args":{"body":"only body"}}"#).unwrap();
        assert_eq!(
            call,
            BridgeInvocation::Call(BridgeCall::ShowForegroundNotification {
                title: None,
                body: Some("only body".into()),
            })
        );
    }

    #[test]
    fn empty_args_object_counts_as_no_arguments() {
        assert_eq!(
            decode(r#"{"method":"retry","args":{}}"#).unwrap(),
            BridgeInvocation::Call(BridgeCall::Retry)
        );
        assert_eq!(
            decode(r#"{"method":"openLocationSettings","args":null}"#).unwrap(),
            BridgeInvocation::Call(BridgeCall::OpenLocationSettings)
        );
        assert_eq!(
            decode(r#"{"method":"isBatteryOptimizationExempt","args":{}}"#).unwrap(),
            BridgeInvocation::Query(BridgeQuery::IsBatteryOptimizationExempt)
        );
    }

    #[test]
    fn notification_without_args_uses_defaults() {
        let expected = BridgeInvocation::Call(BridgeCall::ShowForegroundNotification {
            title: None,
            body: None,
        });
        assert_eq!(
            decode(r#"{"method":"showForegroundNotification"}"#).unwrap(),
            expected
        );
        assert_eq!(
            decode(r#"{"method":"showForegroundNotification","args":{}}"#).unwrap(),
            expected
        );
    }

    #[test]
    fn unit_call_with_real_arguments_is_rejected() {
        assert!(matches!(
            decode(r#"{"method":"retry","args":{"force":true}}"#),
            Err(BridgeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn decodes_queries() {
        assert_eq!(
            decode(r#"{"method":"getCachedPushToken"}"#).unwrap(),
            BridgeInvocation::Query(BridgeQuery::GetCachedPushToken)
        );
    }

    #[test]
    fn unknown_and_malformed_invocations() {
        assert_eq!(
            decode(r#"{"method":"selfDestruct"}"#),
            Err(BridgeError::UnknownMethod("selfDestruct".into()))
        );
        assert_eq!(decode(r#"{"args":{}}"#), Err(BridgeError::MissingMethod));
        assert!(matches!(decode("not json"), Err(BridgeError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"method":"showForegroundNotification","args":{"title":7}}"#),
            Err(BridgeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn queries_answer_from_view() {
        let view = view();
        assert_eq!(
            BridgeQuery::IsBatteryOptimizationExempt.answer(&view),
            BridgeAnswer::Bool(true)
        );
        assert_eq!(
            BridgeQuery::GetCachedPushToken.answer(&view),
            BridgeAnswer::Text("tok".into())
        );
        assert_eq!(
            BridgeQuery::GetLaunchDeepLink.answer(&view),
            BridgeAnswer::Text(String::new())
        );
    }
}
