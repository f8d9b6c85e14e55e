use tracing::{debug, info, trace, warn};

use crate::action::{
    Action, ChatAction, MapAction, NextRideAction, SettingsAction, SocialAction, TimerAction,
};
use crate::badge;
use crate::capabilities::Environment;
use crate::children;
use crate::config::CoreConfig;
use crate::effect::{DebounceKey, Effect, TimedAction};
use crate::fetch::{self, FetchRequest};
use crate::model::{
    AlertSpec, ChatMessages, ErrorState, LocationPost, Model, SettingsState, UserSettings,
};
use crate::navigation::{self, BottomSheetPosition, Route};
use crate::projection::{self, ViewModel};
use crate::prompt;
use crate::{AppError, CYCLE_SECONDS};

/// The reducer. Holds configuration only; all state lives in [`Model`].
#[derive(Debug, Clone, Default)]
pub struct App {
    config: CoreConfig,
}

impl App {
    pub fn new(config: CoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }

    /// Apply `action` to `model` and describe the effects it requires.
    ///
    /// Never performs I/O. Ambient values are read through `env`.
    pub fn update(&self, action: Action, model: &mut Model, env: &Environment) -> Vec<Effect> {
        if action.is_user_initiated() {
            trace!(action = action.name(), "user action");
        }

        let mut effects = children::reduce(&action, model, env);

        match action {
            Action::OnAppear => {
                effects.push(Effect::Send(Action::Map(MapAction::OnAppear)));
                effects.push(Effect::Send(Action::Timer(TimerAction::StartTimer)));
                effects.push(Effect::LoadUserSettings);
                effects.extend(fetch::plan_fan_out(
                    model,
                    vec![FetchRequest::ChatMessages, FetchRequest::RiderLocations],
                ));
                effects.extend(prompt::schedule_once(
                    env.user_defaults.did_show_observation_prompt(),
                    self.config.observation_prompt_delay(),
                    Action::PresentObservationModeAlert,
                ));
            }

            Action::OnDisappear => {}

            Action::FetchLocations => {
                effects.extend(fetch::plan_fan_out(model, vec![FetchRequest::RiderLocations]));
            }

            Action::FetchLocationsResponse(result) => {
                model.is_requesting_rider_locations = false;
                match &result {
                    Ok(riders) => model.map.riders.clone_from(riders),
                    Err(e) => info!(error = %e, "fetching rider locations failed"),
                }
                model.rider_locations = Some(result);
            }

            Action::FetchChatMessages => {
                effects.extend(fetch::plan_fan_out(model, vec![FetchRequest::ChatMessages]));
            }

            Action::FetchChatMessagesResponse(Ok(messages)) => {
                if !model.is_chat_presented() {
                    model.chat_message_badge_count =
                        badge::unread_count(&messages, env.user_defaults.chat_read_watermark());
                }
                model.social.chat.messages = ChatMessages::Results(messages);
            }

            Action::FetchChatMessagesResponse(Err(e)) => {
                info!(error = %e, "fetching chat messages failed");
                let error = AppError::from(&e);
                model.social.chat.messages = ChatMessages::Error(ErrorState {
                    title: "Error".into(),
                    body: format!(
                        "Failed to fetch chat messages. {}",
                        error.user_facing_message()
                    ),
                    error: Some(error),
                });
            }

            Action::PostLocation => {
                if model.settings.is_observation_mode_enabled {
                    debug!("observation mode enabled, not posting location");
                } else {
                    effects.push(Effect::PostLocation(LocationPost {
                        device: env.device_id.id(),
                        location: model.map.location,
                    }));
                }
            }

            Action::PostLocationResponse(Ok(_)) => {}

            Action::PostLocationResponse(Err(e)) => {
                debug!(error = %e, "posting location failed");
            }

            Action::Timer(TimerAction::TimerTicked) => {
                effects.extend(self.on_tick(model));
            }

            Action::Timer(TimerAction::StartTimer) => {}

            Action::UserSettingsLoaded(result) => {
                let settings = result.unwrap_or_else(|e| {
                    warn!(error = %e, "loading user settings failed, using defaults");
                    UserSettings::default()
                });
                model.settings = SettingsState::from(settings.clone());
                model.next_ride.ride_event_settings = settings.ride_event_settings.clone();
                effects.push(Effect::SetAppearance(settings.appearance_settings.color_scheme));

                if settings.ride_event_settings.is_enabled {
                    if let Some(coordinate) = model.current_coordinate() {
                        effects.push(Effect::Send(Action::NextRide(NextRideAction::GetNextRide(
                            coordinate,
                        ))));
                    }
                }
            }

            Action::NextRide(NextRideAction::SetNextRide(ride)) => {
                model.map.next_ride = Some(ride);
                effects.push(Effect::Sequence(vec![
                    TimedAction::immediately(Action::Map(MapAction::SetNextRideBannerVisible(
                        true,
                    ))),
                    TimedAction::new(
                        self.config.banner_expand_delay(),
                        Action::Map(MapAction::SetNextRideBannerExpanded(true)),
                    ),
                    TimedAction::new(
                        self.config.banner_collapse_delay(),
                        Action::Map(MapAction::SetNextRideBannerExpanded(false)),
                    ),
                ]));
            }

            Action::NextRide(NextRideAction::NextRidesResponse(Ok(_))) => {
                if !model.bottom_sheet_position.is_hidden() {
                    navigation::sync_ride_event_overlay(model);
                }
            }

            Action::NextRide(_) => {}

            Action::Map(MapAction::FocusRideEvent(_) | MapAction::FocusNextRide(_)) => {
                effects.extend(navigation::expand_for_focus(
                    model,
                    self.config.focused_sheet_height,
                ));
            }

            Action::Map(MapAction::LocationUpdated(location)) => {
                model.next_ride.user_location = Some(location.coordinate);
                model.did_resolve_initial_location = true;
            }

            Action::Map(_) => {}

            Action::Settings(SettingsAction::RideEvent(_)) => {
                let ride_events = model.settings.ride_event_settings.clone();
                model.next_ride.ride_event_settings = ride_events.clone();

                if ride_events.is_enabled {
                    if let Some(coordinate) = model.current_coordinate() {
                        effects.push(Effect::Debounce {
                            key: DebounceKey::RideEventRadiusChange,
                            delay: self.config.ride_event_debounce(),
                            action: Action::NextRide(NextRideAction::GetNextRide(coordinate)),
                        });
                    }
                }
            }

            Action::Settings(SettingsAction::SetColorScheme(_)) => {}

            Action::SetObservationMode(enabled) => {
                model.settings.is_observation_mode_enabled = enabled;
                model.alert = None;
                effects.push(Effect::PersistObservationPromptShown);
                effects.push(Effect::SaveUserSettings(model.settings.user_settings()));
            }

            Action::PresentObservationModeAlert => {
                model.alert = Some(AlertSpec::observation_mode());
            }

            Action::DismissAlert => model.alert = None,

            Action::DismissSheetView => {
                navigation::set_route(model, None);
                effects.push(Effect::Send(Action::FetchLocations));
            }

            Action::OnRideSelectedFromBottomSheet(ride) => {
                effects.push(Effect::Send(Action::Map(MapAction::FocusRideEvent(
                    ride.coordinate,
                ))));
            }

            Action::SetNavigation(route) => navigation::set_route(model, route),

            Action::SetBottomSheetPosition(position) => match position {
                BottomSheetPosition::Relative(fraction)
                    if BottomSheetPosition::relative(fraction).is_none() =>
                {
                    warn!(fraction, "ignoring out of range bottom sheet position");
                }
                _ => navigation::set_bottom_sheet_position(model, position),
            },

            Action::Social(SocialAction::Chat(ChatAction::OnAppear)) => {
                model.chat_message_badge_count = 0;
            }
        }

        effects
    }

    fn on_tick(&self, model: &mut Model) -> Vec<Effect> {
        let seconds = model.request_timer.seconds_elapsed;
        if seconds >= CYCLE_SECONDS {
            model.request_timer.seconds_elapsed = 0;

            let mut requests = Vec::new();
            if model.route.is_none() {
                requests.push(FetchRequest::RiderLocations);
            }
            if model.route == Some(Route::Chat) {
                requests.push(FetchRequest::ChatMessages);
            }
            return fetch::plan_fan_out(model, requests).into_iter().collect();
        }

        if projection::send_location_now(seconds) {
            return vec![Effect::Send(Action::PostLocation)];
        }
        Vec::new()
    }
}
