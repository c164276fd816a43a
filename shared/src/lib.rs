#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod battery;
pub mod bridge;
pub mod capabilities;
pub mod config;
pub mod device;
pub mod event;
pub mod file_selection;
pub mod model;
pub mod navigation;
pub mod notifications;
pub mod permissions;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::ShellConfig;
pub use crux_core::{render::Render, App as CruxApp, Core};
pub use event::Event;
pub use model::{Model, ViewModel};
pub use navigation::Page;

pub const EXIT_HINT: &str = "Press back again to exit";

pub mod app {
    use tracing::{debug, info, warn};

    use crate::battery::{BatteryPrompter, Rationale};
    use crate::bridge::BridgeCall;
    use crate::capabilities::{Capabilities, PushTokenStore};
    use crate::device;
    use crate::event::{
        BrowserEvent, CheckPurpose, ConnectivityReason, Event, LifecycleEvent, NetworkEvent,
        PushEvent, Startup,
    };
    use crate::file_selection::{FileRequestId, NextStep, PickerRequest};
    use crate::model::{Model, ViewModel};
    use crate::navigation::{NavTrigger, Page, Transition};
    use crate::notifications::{Alert, DispatchOrigin};
    use crate::permissions::{
        media_permissions, CorrelationCode, FollowUp, Permission, LOCATION_PERMISSIONS,
        NOTIFICATION_PERMISSIONS,
    };
    use crate::EXIT_HINT;

    #[derive(Default)]
    pub struct App;

    impl App {
        fn start(startup: Startup, model: &mut Model, caps: &Capabilities) {
            if model.started {
                debug!("duplicate start ignored");
                return;
            }

            if let Some(config) = startup.config {
                match config.validate() {
                    Ok(()) => model.config = config,
                    Err(e) => warn!(error = %e, "invalid shell config, keeping defaults"),
                }
            }
            model.platform = startup.platform;
            model.battery = BatteryPrompter::new(model.config.battery_prompt);
            model.notifications.rebase(model.config.notification_id_base);
            model.launch_deep_link = startup.deep_link.filter(|link| !link.is_empty());
            model.started = true;

            info!(
                manufacturer = %model.platform.manufacturer,
                notification_permission = ?model.platform.notification_permission,
                battery_optimization = ?model.platform.battery_optimization,
                "shell started"
            );

            caps.browser.load(Page::IntroSplash.url(&model.config));

            if let Some(spec) = model.notifications.ensure_channel(&model.config.channel) {
                caps.notifications.ensure_channel(spec);
            }

            match PushTokenStore::new(&model.config.push_token_key) {
                Ok(store) => store.load(&caps.kv, |token| Event::CachedTokenLoaded { token }),
                Err(e) => warn!(error = %e, "push token key rejected, cache disabled"),
            }
            caps.push.fetch_token(|token| Event::TokenFetched { token });

            if model.platform.notification_permission.is_supported() {
                caps.permissions.check(Permission::PostNotifications, |granted| {
                    Event::PermissionChecked {
                        purpose: CheckPurpose::StartupNotifications,
                        granted,
                    }
                });
            }

            caps.render.render();
        }

        fn apply(transition: Option<Transition>, caps: &Capabilities, model: &Model) {
            let Some(transition) = transition else {
                return;
            };
            debug!(to = ?transition.to, reload = transition.is_reload(), "loading page");
            caps.browser.load(transition.to.url(&model.config));
            if transition.arm_subscription {
                caps.connectivity.subscribe();
            }
            caps.render.render();
        }

        fn request_permissions(
            permissions: &[Permission],
            code: CorrelationCode,
            follow_up: FollowUp,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            model.permissions.request(permissions, code, follow_up);
            caps.permissions.request(permissions.to_vec(), code);
        }

        fn launch_picker(request: FileRequestId, caps: &Capabilities) {
            caps.file_picker
                .launch(PickerRequest::media(request), move |result| Event::PickerFinished {
                    request,
                    result,
                });
        }

        fn post(origin: DispatchOrigin, alert: Alert, model: &mut Model, caps: &Capabilities) {
            let dispatch = model.notifications.post(&model.config, origin, alert);
            caps.notifications.dispatch(dispatch);
        }

        fn store_token(token: String, model: &mut Model, caps: &Capabilities) {
            if token.is_empty() {
                debug!("empty push token ignored");
                return;
            }
            model.cached_push_token = token;

            match PushTokenStore::new(&model.config.push_token_key) {
                Ok(store) => {
                    if let Err(e) = store.save(&caps.kv, &model.cached_push_token, |ok| {
                        Event::TokenPersisted { ok }
                    }) {
                        warn!(error = %e, "push token not persisted");
                    }
                }
                Err(e) => warn!(error = %e, "push token key rejected, cache disabled"),
            }
            caps.render.render();
        }

        fn permission_checked(
            purpose: CheckPurpose,
            granted: bool,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            match purpose {
                CheckPurpose::StartupNotifications => {
                    if !granted {
                        Self::request_permissions(
                            NOTIFICATION_PERMISSIONS,
                            CorrelationCode::NOTIFICATIONS,
                            FollowUp::Nothing,
                            model,
                            caps,
                        );
                    }
                }
                CheckPurpose::LocationRequest => {
                    if granted {
                        debug!("location already granted");
                    } else {
                        Self::request_permissions(
                            LOCATION_PERMISSIONS,
                            CorrelationCode::LOCATION,
                            FollowUp::Nothing,
                            model,
                            caps,
                        );
                    }
                }
                CheckPurpose::Geolocation { origin } => {
                    if !granted {
                        Self::request_permissions(
                            LOCATION_PERMISSIONS,
                            CorrelationCode::LOCATION,
                            FollowUp::Nothing,
                            model,
                            caps,
                        );
                    }
                    caps.browser.answer_geolocation(origin, granted);
                }
                CheckPurpose::FileSelection { request } => {
                    match model.files.permission_known(request, granted) {
                        Some(NextStep::LaunchPicker(id)) => Self::launch_picker(id, caps),
                        Some(NextStep::RequestPermission(id)) => Self::request_permissions(
                            media_permissions(model.platform.media_permissions),
                            CorrelationCode::MEDIA,
                            FollowUp::LaunchFilePicker { request: id },
                            model,
                            caps,
                        ),
                        None => {}
                    }
                    caps.render.render();
                }
            }
        }

        fn bridge(call: BridgeCall, model: &mut Model, caps: &Capabilities) {
            match call {
                BridgeCall::Retry => {
                    let generation = model.navigation.generation();
                    caps.connectivity.has_internet(move |online| Event::ConnectivityChecked {
                        reason: ConnectivityReason::Retry { generation },
                        online,
                    });
                }
                BridgeCall::SplashIntroFinished => {
                    if model.navigation.page() == Page::IntroSplash {
                        caps.connectivity.has_internet(|online| Event::ConnectivityChecked {
                            reason: ConnectivityReason::SplashFinished,
                            online,
                        });
                    } else {
                        debug!(page = ?model.navigation.page(), "splash already finished");
                    }
                }
                BridgeCall::ShowForegroundNotification { title, body } => {
                    let alert = Alert::new(&model.config, title, body);
                    Self::post(DispatchOrigin::Foreground, alert, model, caps);
                }
                BridgeCall::RequestLocationPermission => {
                    caps.permissions.check(Permission::FineLocation, |granted| {
                        Event::PermissionChecked {
                            purpose: CheckPurpose::LocationRequest,
                            granted,
                        }
                    });
                }
                BridgeCall::OpenLocationSettings => caps.system.open_location_settings(),
                BridgeCall::OpenBatteryOptimizationSettings => {
                    if model.platform.battery_optimization.is_supported() {
                        caps.system.open_battery_optimization_settings();
                    } else {
                        debug!("battery optimization not supported on this device");
                    }
                }
                BridgeCall::AcknowledgeDeepLink => {
                    model.launch_deep_link = None;
                    caps.render.render();
                }
            }
        }

        fn lifecycle(event: LifecycleEvent, model: &mut Model, caps: &Capabilities) {
            match event {
                LifecycleEvent::Started(startup) => Self::start(*startup, model, caps),

                LifecycleEvent::Resumed => {
                    if model.battery.should_check(model.platform.battery_optimization) {
                        caps.system
                            .query_battery_exemption(|exempt| Event::BatteryExemptionQueried { exempt });
                    }
                }

                LifecycleEvent::WindowFocusChanged { has_focus } => {
                    if has_focus {
                        caps.system
                            .hide_system_bars(device::bars_to_hide(&model.platform.manufacturer));
                    }
                }

                LifecycleEvent::NotificationOpened { deep_link } => {
                    if let Some(link) = deep_link.filter(|link| !link.is_empty()) {
                        info!("opened from notification with deep link");
                        model.launch_deep_link = Some(link);
                        caps.render.render();
                    }
                }

                LifecycleEvent::BackPressed { now_ms } => {
                    caps.browser
                        .can_go_back(move |can_go_back| Event::HistoryChecked { can_go_back, now_ms });
                }

                LifecycleEvent::Destroyed => {
                    if model.navigation.tear_down() {
                        caps.connectivity.unsubscribe();
                    }
                    if let Some(resolution) = model.files.cancel() {
                        caps.browser.resolve_file_chooser(resolution);
                    }
                    info!("shell destroyed");
                }
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(event = event.name(), "update");

            match event {
                Event::Lifecycle(event) => Self::lifecycle(event, model, caps),

                Event::Bridge(call) => Self::bridge(call, model, caps),

                Event::Browser(BrowserEvent::FileChooserRequested { request }) => {
                    if let Some(stale) = model.files.begin(request) {
                        caps.browser.resolve_file_chooser(stale);
                    }
                    let checked = media_permissions(model.platform.media_permissions)
                        .first()
                        .copied()
                        .unwrap_or(Permission::Camera);
                    caps.permissions.check(checked, move |granted| Event::PermissionChecked {
                        purpose: CheckPurpose::FileSelection { request },
                        granted,
                    });
                    caps.render.render();
                }

                Event::Browser(BrowserEvent::GeolocationPromptRequested { origin }) => {
                    caps.permissions.check(Permission::FineLocation, move |granted| {
                        Event::PermissionChecked {
                            purpose: CheckPurpose::Geolocation { origin },
                            granted,
                        }
                    });
                }

                Event::Network(network) => {
                    let trigger = match network {
                        NetworkEvent::Available => NavTrigger::NetworkAvailable,
                        NetworkEvent::Lost => NavTrigger::NetworkLost,
                    };
                    let transition = model.navigation.evaluate(trigger);
                    Self::apply(transition, caps, model);
                }

                Event::PermissionResult { code, grants } => {
                    let Some(answered) = model.permissions.answer(code, grants) else {
                        return;
                    };
                    match answered.request.follow_up {
                        FollowUp::Nothing => {}
                        FollowUp::LaunchFilePicker { request } => {
                            if model.files.proceed_to_picker(request) {
                                Self::launch_picker(request, caps);
                            }
                        }
                    }
                }

                Event::Push(PushEvent::TokenRefreshed { token }) => {
                    info!("push token refreshed");
                    Self::store_token(token, model, caps);
                }

                Event::Push(PushEvent::MessageReceived(message)) => {
                    let alert = message.into_alert(&model.config);
                    Self::post(DispatchOrigin::Background, alert, model, caps);
                }

                Event::ConnectivityChecked { reason, online } => {
                    let transition = model.navigation.evaluate(reason.trigger(online));
                    Self::apply(transition, caps, model);
                }

                Event::PermissionChecked { purpose, granted } => {
                    Self::permission_checked(purpose, granted, model, caps);
                }

                Event::PickerFinished { request, result } => {
                    if let Some(resolution) = model.files.picker_finished(request, result) {
                        caps.browser.resolve_file_chooser(resolution);
                        caps.render.render();
                    }
                }

                Event::HistoryChecked { can_go_back, now_ms } => {
                    if can_go_back {
                        model.back = crate::model::BackPress::default();
                        caps.browser.go_back();
                    } else if model.back.press(now_ms, model.config.back_exit_window_ms) {
                        info!("exit requested by back press");
                        caps.system.exit();
                    } else {
                        caps.system.show_toast(EXIT_HINT);
                    }
                }

                Event::BatteryExemptionQueried { exempt } => {
                    if model.battery.exemption_observed(exempt) {
                        let rationale = Rationale::build(&model.config, &model.platform.manufacturer);
                        caps.system
                            .show_rationale(rationale, |choice| Event::RationaleAnswered { choice });
                    }
                    caps.render.render();
                }

                Event::RationaleAnswered { choice } => {
                    if model.battery.answered(choice) {
                        caps.system.open_battery_optimization_settings();
                    } else {
                        debug!(?choice, "battery settings not opened");
                    }
                }

                Event::TokenFetched { token } => match token {
                    Some(token) => Self::store_token(token, model, caps),
                    None => debug!("push transport returned no token"),
                },

                Event::CachedTokenLoaded { token } => {
                    // A refresh may have landed first; it wins.
                    if model.cached_push_token.is_empty() {
                        if let Some(token) = token {
                            model.cached_push_token = token;
                            caps.render.render();
                        }
                    }
                }

                Event::TokenPersisted { ok } => {
                    debug!(ok, "push token persisted");
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let page = model.navigation.page();
            ViewModel {
                page,
                page_url: page.url(&model.config).to_string(),
                battery_optimization_exempt: model
                    .battery
                    .is_exempt(model.platform.battery_optimization),
                cached_push_token: model.cached_push_token.clone(),
                launch_deep_link: model.launch_deep_link.clone(),
                file_request_pending: model.files.pending().is_some(),
            }
        }
    }
}
