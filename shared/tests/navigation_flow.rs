use assert_matches::assert_matches;
use crux_core::testing::AppTester;
use crux_core::Request;
use shell_core::bridge::BridgeCall;
use shell_core::capabilities::{
    BrowserOperation, BrowserOutput, ConnectivityOperation, ConnectivityOutput, PermissionOperation,
    SystemOperation,
};
use shell_core::config::{DEFAULT_INTRO_URL, DEFAULT_LIVE_URL, DEFAULT_OFFLINE_URL};
use shell_core::event::{LifecycleEvent, NetworkEvent, Startup};
use shell_core::model::{PlatformProfile, Support};
use shell_core::permissions::Permission;
use shell_core::{App, Effect, Event, Model, Page, EXIT_HINT};

fn start(platform: PlatformProfile) -> (AppTester<App, Effect>, Model, Vec<Effect>) {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();
    let startup = Startup {
        platform,
        ..Startup::default()
    };
    let update = app.update(
        Event::Lifecycle(LifecycleEvent::Started(Box::new(startup))),
        &mut model,
    );
    (app, model, update.effects)
}

fn loads(effects: &[Effect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Browser(request) => match &request.operation {
                BrowserOperation::Load { url } => Some(url.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn connectivity_ops(effects: &[Effect]) -> Vec<ConnectivityOperation> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Connectivity(request) => Some(request.operation),
            _ => None,
        })
        .collect()
}

fn connectivity_check(effects: Vec<Effect>) -> Request<ConnectivityOperation> {
    effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Connectivity(request) if request.operation == ConnectivityOperation::HasInternet => {
                Some(request)
            }
            _ => None,
        })
        .expect("connectivity check requested")
}

/// Sends a bridge call that snapshots connectivity, answers the snapshot and
/// replays the resulting events. Returns every effect emitted along the way.
fn bridge_with_connectivity(
    app: &AppTester<App, Effect>,
    model: &mut Model,
    call: BridgeCall,
    online: bool,
) -> Vec<Effect> {
    let update = app.update(Event::Bridge(call), model);
    let mut request = connectivity_check(update.effects);
    let update = app
        .resolve(&mut request, ConnectivityOutput::HasInternet(online))
        .expect("connectivity resolves");

    let mut effects = Vec::new();
    for event in update.events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

#[test]
fn startup_loads_intro_and_does_not_subscribe() {
    let (_app, model, effects) = start(PlatformProfile::default());

    assert_eq!(model.navigation.page(), Page::IntroSplash);
    assert_eq!(loads(&effects), vec![DEFAULT_INTRO_URL.to_string()]);
    assert!(connectivity_ops(&effects).is_empty());
    assert!(effects.iter().any(|e| matches!(e, Effect::Notifications(_))));
    assert!(effects.iter().any(|e| matches!(e, Effect::KeyValue(_))));
    assert!(effects.iter().any(|e| matches!(e, Effect::Push(_))));
    assert!(effects.iter().any(|e| matches!(e, Effect::Render(_))));
    assert!(!effects.iter().any(|e| matches!(e, Effect::Permissions(_))));
}

#[test]
fn startup_checks_notification_permission_when_supported() {
    let (app, mut model, effects) = start(PlatformProfile {
        notification_permission: Support::Supported,
        ..PlatformProfile::default()
    });

    let mut check = effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Permissions(request) => Some(request),
            _ => None,
        })
        .expect("notification permission checked");
    assert_eq!(
        check.operation,
        PermissionOperation::Check {
            permission: Permission::PostNotifications
        }
    );

    let update = app
        .resolve(&mut check, shell_core::capabilities::PermissionOutput::Granted(false))
        .expect("check resolves");
    let effects: Vec<Effect> = update
        .events
        .into_iter()
        .flat_map(|event| app.update(event, &mut model).effects)
        .collect();

    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::Permissions(request)
            if matches!(&request.operation, PermissionOperation::Request { code, .. } if code.0 == 1001)
    )));
}

#[test]
fn splash_finished_online_loads_live_and_arms_subscription() {
    let (app, mut model, _) = start(PlatformProfile::default());

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);

    assert_eq!(model.navigation.page(), Page::LiveApp);
    assert_eq!(loads(&effects), vec![DEFAULT_LIVE_URL.to_string()]);
    assert_eq!(connectivity_ops(&effects), vec![ConnectivityOperation::Subscribe]);
    assert_eq!(app.view(&model).page_url, DEFAULT_LIVE_URL);
}

#[test]
fn splash_finished_offline_loads_fallback() {
    let (app, mut model, _) = start(PlatformProfile::default());

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, false);

    assert_eq!(model.navigation.page(), Page::OfflineFallback);
    assert_eq!(loads(&effects), vec![DEFAULT_OFFLINE_URL.to_string()]);
    assert_eq!(connectivity_ops(&effects), vec![ConnectivityOperation::Subscribe]);
}

#[test]
fn network_callbacks_before_splash_are_ignored() {
    let (app, mut model, _) = start(PlatformProfile::default());

    let update = app.update(Event::Network(NetworkEvent::Lost), &mut model);
    assert!(loads(&update.effects).is_empty());
    let update = app.update(Event::Network(NetworkEvent::Available), &mut model);
    assert!(loads(&update.effects).is_empty());

    assert_eq!(model.navigation.page(), Page::IntroSplash);
}

#[test]
fn connectivity_changes_swap_pages_after_splash() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);

    let update = app.update(Event::Network(NetworkEvent::Lost), &mut model);
    assert_eq!(loads(&update.effects), vec![DEFAULT_OFFLINE_URL.to_string()]);
    assert_eq!(model.navigation.page(), Page::OfflineFallback);

    let update = app.update(Event::Network(NetworkEvent::Lost), &mut model);
    assert!(loads(&update.effects).is_empty());

    let update = app.update(Event::Network(NetworkEvent::Available), &mut model);
    assert_eq!(loads(&update.effects), vec![DEFAULT_LIVE_URL.to_string()]);
    assert!(connectivity_ops(&update.effects).is_empty());
}

#[test]
fn retry_while_live_and_online_reloads_live() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::Retry, true);

    assert_eq!(loads(&effects), vec![DEFAULT_LIVE_URL.to_string()]);
    assert_eq!(model.navigation.page(), Page::LiveApp);
    assert!(connectivity_ops(&effects).is_empty());
}

#[test]
fn retry_from_offline_follows_connectivity() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, false);

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::Retry, false);
    assert_eq!(loads(&effects), vec![DEFAULT_OFFLINE_URL.to_string()]);

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::Retry, true);
    assert_eq!(loads(&effects), vec![DEFAULT_LIVE_URL.to_string()]);
    assert_eq!(model.navigation.page(), Page::LiveApp);
}

#[test]
fn retry_answer_older_than_network_callbacks_is_dropped() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, false);

    let update = app.update(Event::Bridge(BridgeCall::Retry), &mut model);
    let mut snapshot = connectivity_check(update.effects);

    app.update(Event::Network(NetworkEvent::Available), &mut model);
    app.update(Event::Network(NetworkEvent::Lost), &mut model);
    assert_eq!(model.navigation.page(), Page::OfflineFallback);

    let update = app
        .resolve(&mut snapshot, ConnectivityOutput::HasInternet(true))
        .expect("connectivity resolves");
    let effects: Vec<Effect> = update
        .events
        .into_iter()
        .flat_map(|event| app.update(event, &mut model).effects)
        .collect();

    assert!(loads(&effects).is_empty());
    assert_eq!(model.navigation.page(), Page::OfflineFallback);
}

#[test]
fn retry_requested_after_network_callbacks_still_applies() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);
    app.update(Event::Network(NetworkEvent::Lost), &mut model);

    let effects = bridge_with_connectivity(&app, &mut model, BridgeCall::Retry, true);

    assert_eq!(loads(&effects), vec![DEFAULT_LIVE_URL.to_string()]);
    assert_eq!(model.navigation.page(), Page::LiveApp);
}

#[test]
fn second_splash_finished_is_ignored() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);

    let update = app.update(Event::Bridge(BridgeCall::SplashIntroFinished), &mut model);
    assert!(connectivity_ops(&update.effects).is_empty());
}

#[test]
fn destroy_tears_down_subscription_once() {
    let (app, mut model, _) = start(PlatformProfile::default());
    bridge_with_connectivity(&app, &mut model, BridgeCall::SplashIntroFinished, true);

    let update = app.update(Event::Lifecycle(LifecycleEvent::Destroyed), &mut model);
    assert_eq!(connectivity_ops(&update.effects), vec![ConnectivityOperation::Unsubscribe]);

    let update = app.update(Event::Network(NetworkEvent::Lost), &mut model);
    assert!(loads(&update.effects).is_empty());

    let update = app.update(Event::Lifecycle(LifecycleEvent::Destroyed), &mut model);
    assert!(connectivity_ops(&update.effects).is_empty());
}

fn press_back(
    app: &AppTester<App, Effect>,
    model: &mut Model,
    now_ms: u64,
    can_go_back: bool,
) -> Vec<Effect> {
    let update = app.update(Event::Lifecycle(LifecycleEvent::BackPressed { now_ms }), model);
    let mut request = update
        .effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::Browser(request) if request.operation == BrowserOperation::CanGoBack => {
                Some(request)
            }
            _ => None,
        })
        .expect("history queried");
    let update = app
        .resolve(&mut request, BrowserOutput::History { can_go_back })
        .expect("history resolves");
    update
        .events
        .into_iter()
        .flat_map(|event| app.update(event, model).effects)
        .collect()
}

fn system_ops(effects: &[Effect]) -> Vec<SystemOperation> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::System(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn back_press_navigates_history_first() {
    let (app, mut model, _) = start(PlatformProfile::default());

    let effects = press_back(&app, &mut model, 1_000, true);
    assert_eq!(effects.len(), 1);
    assert!(matches!(
        &effects[0],
        Effect::Browser(request) if request.operation == BrowserOperation::GoBack
    ));
    assert!(system_ops(&effects).is_empty());
}

#[test]
fn double_back_press_exits() {
    let (app, mut model, _) = start(PlatformProfile::default());

    let effects = press_back(&app, &mut model, 10_000, false);
    assert_eq!(
        system_ops(&effects),
        vec![SystemOperation::ShowToast {
            text: EXIT_HINT.to_string()
        }]
    );

    let effects = press_back(&app, &mut model, 11_500, false);
    assert_eq!(system_ops(&effects), vec![SystemOperation::Exit]);
}

#[test]
fn slow_second_back_press_only_warns_again() {
    let (app, mut model, _) = start(PlatformProfile::default());

    press_back(&app, &mut model, 10_000, false);
    let effects = press_back(&app, &mut model, 12_500, false);
    assert_matches!(system_ops(&effects).as_slice(), [SystemOperation::ShowToast { .. }]);
}
