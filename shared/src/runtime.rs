//! Actor that owns the [`Model`] and executes effects.
//!
//! Actions are processed one at a time, in arrival order, from a single
//! queue. Every effect runs as its own task and reports back only by
//! sending a new action into that queue. Nothing is cancelled except a
//! superseded debounce and a replaced ticker.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::action::{Action, NextRideAction};
use crate::app::App;
use crate::capabilities::{CapabilityError, Capabilities, SettingsStore};
use crate::config::{ConfigError, CoreConfig};
use crate::debounce::Debouncer;
use crate::effect::{DebounceKey, Effect, TimedAction};
use crate::fetch;
use crate::model::{Model, UserSettings};
use crate::projection::ViewModel;
use crate::timer;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("the runtime has shut down")]
    Closed,
}

/// Cloneable entry point for shells feeding actions into a [`Runtime`].
#[derive(Debug, Clone)]
pub struct RuntimeHandle {
    sender: UnboundedSender<Action>,
}

impl RuntimeHandle {
    pub fn send(&self, action: Action) -> Result<(), RuntimeError> {
        self.sender.send(action).map_err(|_| RuntimeError::Closed)
    }
}

pub struct Runtime {
    app: App,
    model: Model,
    caps: Capabilities,
    sender: UnboundedSender<Action>,
    receiver: UnboundedReceiver<Action>,
    debouncer: Debouncer<DebounceKey>,
    ticker: Option<JoinHandle<()>>,
}

impl Runtime {
    pub fn new(caps: Capabilities, config: CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            app: App::new(config),
            model: Model::new(),
            caps,
            sender,
            receiver,
            debouncer: Debouncer::new(),
            ticker: None,
        })
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn view(&self) -> ViewModel {
        self.app.view(&self.model)
    }

    /// Process one action immediately and start its effects.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(action = action.name()))]
    pub fn dispatch(&mut self, action: Action) {
        debug!("processing action");
        let effects = self.app.update(action, &mut self.model, &self.caps.env);
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Process queued actions until `duration` has elapsed.
    pub async fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                () = sleep_until(deadline) => break,
                next = self.receiver.recv() => match next {
                    Some(action) => self.dispatch(action),
                    None => break,
                },
            }
        }
    }

    /// Process queued actions until `shutdown` resolves, then hand back the final model.
    pub async fn run_until<F>(mut self, shutdown: F) -> Model
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                next = self.receiver.recv() => match next {
                    Some(action) => self.dispatch(action),
                    None => break,
                },
            }
        }
        std::mem::take(&mut self.model)
    }

    fn execute(&mut self, effect: Effect) {
        debug!(effect = effect.name(), "executing effect");
        match effect {
            Effect::Send(action) => self.enqueue(action),

            Effect::FanOut(requests) => {
                tokio::spawn(fetch::fan_out(
                    self.caps.api.clone(),
                    requests,
                    self.sender.clone(),
                ));
            }

            Effect::PostLocation(post) => {
                let api = self.caps.api.clone();
                self.spawn_reply(async move {
                    Action::PostLocationResponse(api.post_rider_location(&post).await)
                });
            }

            Effect::FetchNextRides {
                coordinate,
                radius_km,
            } => {
                let api = self.caps.api.clone();
                self.spawn_reply(async move {
                    let result = api.fetch_next_rides(coordinate, radius_km).await;
                    Action::NextRide(NextRideAction::NextRidesResponse(result))
                });
            }

            Effect::LoadUserSettings => {
                let store = self.caps.settings.clone();
                self.spawn_reply(async move {
                    Action::UserSettingsLoaded(store.load_user_settings().await)
                });
            }

            Effect::SaveUserSettings(settings) => {
                let store = self.caps.settings.clone();
                tokio::spawn(async move {
                    if let Err(e) = save_settings(store, settings).await {
                        warn!(error = %e, "saving user settings failed");
                    }
                });
            }

            Effect::SetAppearance(scheme) => self.caps.appearance.set_appearance(scheme),

            Effect::PersistObservationPromptShown => {
                self.caps.env.user_defaults.set_did_show_observation_prompt(true);
            }

            Effect::StartTimer => {
                if let Some(previous) = self.ticker.take() {
                    previous.abort();
                }
                self.ticker = Some(timer::spawn_ticker(
                    self.app.config().tick_interval(),
                    self.sender.clone(),
                ));
            }

            Effect::Delayed(step) => self.spawn_sequence(vec![step]),

            Effect::Sequence(steps) => self.spawn_sequence(steps),

            Effect::Debounce { key, delay, action } => {
                self.debouncer.schedule(key, delay, action, &self.sender);
            }
        }
    }

    fn enqueue(&self, action: Action) {
        if self.sender.send(action).is_err() {
            debug!("queue closed, dropping action");
        }
    }

    fn spawn_reply<F>(&self, reply: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let action = reply.await;
            if sender.send(action).is_err() {
                debug!("queue closed, dropping reply");
            }
        });
    }

    /// Each step waits for its delay after the previous step was sent.
    fn spawn_sequence(&self, steps: Vec<TimedAction>) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            for step in steps {
                sleep(step.after).await;
                if sender.send(step.action).is_err() {
                    debug!("queue closed, abandoning sequence");
                    return;
                }
            }
        });
    }
}

async fn save_settings(
    store: Arc<dyn SettingsStore>,
    settings: UserSettings,
) -> Result<(), CapabilityError> {
    store.save_user_settings(&settings).await?;
    Ok(())
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{MapAction, RideEventSettingsAction, SettingsAction, TimerAction};
    use crate::capabilities::testing::Harness;
    use crate::capabilities::{Clock, NetworkError, UserDefaults};
    use crate::model::{ChatMessage, ChatMessages, ColorScheme, Coordinate, Location, Ride};
    use crate::projection;

    fn runtime(harness: &Harness) -> Runtime {
        Runtime::new(harness.capabilities(), CoreConfig::default()).unwrap()
    }

    fn location() -> Location {
        Location {
            coordinate: Coordinate::new(48.14, 11.58).unwrap(),
            timestamp: 1_700_000_000.0,
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let harness = Harness::new();
        let config = CoreConfig {
            tick_interval_ms: 0,
            ..CoreConfig::default()
        };
        assert!(Runtime::new(harness.capabilities(), config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn offline_riders_do_not_block_chat() {
        let harness = Harness::new();
        harness.api.set_riders(Err(NetworkError::ConnectionLost));
        let messages = vec![ChatMessage {
            identifier: "1".into(),
            device: "other".into(),
            message: "meet at the fountain".into(),
            timestamp: 100.0,
        }];
        harness.api.set_chat(Ok(messages.clone()));

        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::OnAppear);
        runtime.run_for(Duration::from_millis(100)).await;

        assert!(projection::has_offline_error(runtime.model()));
        assert!(!runtime.model().is_requesting_rider_locations);
        assert_eq!(
            runtime.model().social.chat.messages,
            ChatMessages::Results(messages)
        );
        assert_eq!(runtime.model().chat_message_badge_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_cycle_posts_then_refreshes() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::Map(MapAction::LocationUpdated(location())));
        runtime.dispatch(Action::Timer(TimerAction::StartTimer));

        runtime.run_for(Duration::from_millis(30_500)).await;
        assert_eq!(runtime.model().request_timer.seconds_elapsed, 30);
        assert_eq!(harness.api.posted().len(), 1);
        assert_eq!(harness.api.posted()[0].device, "device-1");
        assert_eq!(harness.api.posted()[0].location, Some(location()));

        runtime.run_for(Duration::from_secs(30)).await;
        assert_eq!(runtime.model().request_timer.seconds_elapsed, 0);
        assert_eq!(harness.api.rider_calls(), 1);
        assert_eq!(harness.api.posted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn observation_mode_never_posts() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::SetObservationMode(true));
        runtime.dispatch(Action::Map(MapAction::LocationUpdated(location())));
        runtime.dispatch(Action::Timer(TimerAction::StartTimer));

        runtime.run_for(Duration::from_millis(125_500)).await;
        assert!(harness.api.posted().is_empty());
        assert_eq!(harness.api.rider_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_timer_keeps_one_tick_source() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::Timer(TimerAction::StartTimer));
        runtime.run_for(Duration::from_millis(500)).await;
        runtime.dispatch(Action::Timer(TimerAction::StartTimer));

        runtime.run_for(Duration::from_millis(5_250)).await;
        assert_eq!(runtime.model().request_timer.seconds_elapsed, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn observation_prompt_shows_once_across_sessions() {
        let harness = Harness::new();

        let mut first = runtime(&harness);
        first.dispatch(Action::OnAppear);
        first.run_for(Duration::from_millis(2_900)).await;
        assert!(first.model().alert.is_none());

        first.run_for(Duration::from_millis(200)).await;
        let alert = first.model().alert.clone().expect("alert presented");
        assert_eq!(alert.buttons.len(), 2);

        first.dispatch(alert.buttons[0].action.clone());
        assert!(first.model().alert.is_none());
        assert!(harness.user_defaults.did_show_observation_prompt());
        drop(first);

        let mut second = runtime(&harness);
        second.dispatch(Action::OnAppear);
        second.run_for(Duration::from_secs(10)).await;
        assert!(second.model().alert.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn radius_burst_fetches_next_ride_once() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::Map(MapAction::LocationUpdated(location())));

        for radius in [5, 10, 15, 20] {
            runtime.dispatch(Action::Settings(SettingsAction::RideEvent(
                RideEventSettingsAction::SetRadius(radius),
            )));
            runtime.run_for(Duration::from_millis(500)).await;
        }
        assert_eq!(harness.api.next_ride_calls(), 0);

        runtime.run_for(Duration::from_secs(3)).await;
        assert_eq!(harness.api.next_ride_calls(), 1);
        assert_eq!(
            runtime.model().settings.ride_event_settings.event_search_radius_km,
            20
        );
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_lookup_rechecks_enablement() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::Map(MapAction::LocationUpdated(location())));

        runtime.dispatch(Action::Settings(SettingsAction::RideEvent(
            RideEventSettingsAction::SetRadius(5),
        )));
        runtime.dispatch(Action::Settings(SettingsAction::RideEvent(
            RideEventSettingsAction::SetEnabled(false),
        )));
        runtime.run_for(Duration::from_secs(3)).await;

        assert_eq!(harness.api.next_ride_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn found_ride_runs_banner_sequence() {
        let harness = Harness::new();
        let now = harness.clock.now();
        harness.api.set_next_rides(Ok(vec![Ride {
            id: 11,
            title: "Critical Mass Munich".into(),
            coordinate: location().coordinate,
            starts_at: now.add_millis(3_600_000),
            location_name: Some("Geschwister-Scholl-Platz".into()),
        }]));

        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::NextRide(NextRideAction::GetNextRide(
            location().coordinate,
        )));
        runtime.run_for(Duration::from_millis(100)).await;

        let map = &runtime.model().map;
        assert_eq!(map.next_ride.as_ref().map(|r| r.id), Some(11));
        assert!(map.is_next_ride_banner_visible);
        assert!(!map.is_next_ride_banner_expanded);

        runtime.dispatch(Action::SetNavigation(Some(crate::navigation::Route::Rules)));
        runtime.run_for(Duration::from_secs(1)).await;
        assert!(runtime.model().map.is_next_ride_banner_expanded);

        runtime.run_for(Duration::from_millis(7_800)).await;
        assert!(runtime.model().map.is_next_ride_banner_expanded);

        runtime.run_for(Duration::from_millis(300)).await;
        assert!(!runtime.model().map.is_next_ride_banner_expanded);
        assert!(runtime.model().map.is_next_ride_banner_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn stored_settings_apply_appearance() {
        let harness = Harness::new();
        let mut settings = UserSettings::default();
        settings.appearance_settings.color_scheme = ColorScheme::Dark;
        harness.settings.save_user_settings(&settings).await.unwrap();

        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::OnAppear);
        runtime.run_for(Duration::from_millis(100)).await;

        assert_eq!(
            *harness.appearance.0.lock().unwrap(),
            vec![ColorScheme::Dark]
        );
        assert_eq!(
            runtime.model().settings.appearance_settings.color_scheme,
            ColorScheme::Dark
        );
    }

    #[tokio::test(start_paused = true)]
    async fn settings_changes_are_persisted() {
        let harness = Harness::new();
        let mut runtime = runtime(&harness);
        runtime.dispatch(Action::Settings(SettingsAction::SetColorScheme(
            ColorScheme::Light,
        )));
        runtime.run_for(Duration::from_millis(100)).await;

        let stored = harness.settings.load_user_settings().await.unwrap();
        assert_eq!(stored.appearance_settings.color_scheme, ColorScheme::Light);
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_returns_final_model() {
        let harness = Harness::new();
        let runtime = runtime(&harness);
        let handle = runtime.handle();
        handle.send(Action::FetchLocations).unwrap();

        let model = runtime.run_until(sleep(Duration::from_millis(100))).await;
        assert_eq!(model.rider_locations, Some(Ok(Vec::new())));
        assert_eq!(handle.send(Action::OnDisappear), Err(RuntimeError::Closed));
    }
}
