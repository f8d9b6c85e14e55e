//! Child feature reducers.
//!
//! Each child owns one sub-state of the [`Model`] and sees only its own
//! actions. They run before the core reducer, so the core observes the
//! child's updated state.

use tracing::{debug, info};

use crate::action::{Action, MapAction, NextRideAction, RideEventSettingsAction, SettingsAction};
use crate::capabilities::Environment;
use crate::effect::Effect;
use crate::model::{MapState, Model, NextRideState, Ride, SettingsState, UnixTimeMs};
use crate::timer;

pub fn reduce(action: &Action, model: &mut Model, env: &Environment) -> Vec<Effect> {
    match action {
        Action::Map(action) => reduce_map(&mut model.map, action),
        Action::NextRide(action) => reduce_next_ride(&mut model.next_ride, action, env),
        Action::Settings(action) => reduce_settings(&mut model.settings, action),
        Action::Timer(action) => timer::reduce(&mut model.request_timer, *action),
        _ => Vec::new(),
    }
}

fn reduce_map(state: &mut MapState, action: &MapAction) -> Vec<Effect> {
    match action {
        MapAction::OnAppear => state.is_initialized = true,
        MapAction::FocusRideEvent(coordinate) | MapAction::FocusNextRide(coordinate) => {
            state.focused_coordinate = Some(*coordinate);
        }
        MapAction::SetNextRideBannerVisible(visible) => {
            state.is_next_ride_banner_visible = *visible;
        }
        MapAction::SetNextRideBannerExpanded(expanded) => {
            state.is_next_ride_banner_expanded = *expanded;
        }
        MapAction::LocationUpdated(location) => state.location = Some(*location),
        MapAction::SetVisibleRidersCount(count) => state.visible_riders_count = Some(*count),
    }
    Vec::new()
}

fn reduce_next_ride(
    state: &mut NextRideState,
    action: &NextRideAction,
    env: &Environment,
) -> Vec<Effect> {
    match action {
        NextRideAction::GetNextRide(coordinate) => {
            if !state.ride_event_settings.is_enabled {
                debug!("ride events disabled, skipping next ride lookup");
                return Vec::new();
            }
            if !env.network.is_available() {
                debug!("network unavailable, skipping next ride lookup");
                return Vec::new();
            }
            vec![Effect::FetchNextRides {
                coordinate: *coordinate,
                radius_km: state.ride_event_settings.event_search_radius_km,
            }]
        }
        NextRideAction::NextRidesResponse(Ok(rides)) => {
            state.ride_events = rides.clone();
            upcoming_ride(rides, env.clock.now())
                .map(|ride| {
                    vec![Effect::Send(Action::NextRide(NextRideAction::SetNextRide(
                        ride.clone(),
                    )))]
                })
                .unwrap_or_default()
        }
        NextRideAction::NextRidesResponse(Err(e)) => {
            info!(error = %e, "fetching next rides failed");
            Vec::new()
        }
        NextRideAction::SetNextRide(ride) => {
            state.next_ride = Some(ride.clone());
            Vec::new()
        }
    }
}

/// Earliest ride that has not started yet.
fn upcoming_ride(rides: &[Ride], now: UnixTimeMs) -> Option<&Ride> {
    rides
        .iter()
        .filter(|ride| ride.starts_at >= now)
        .min_by_key(|ride| ride.starts_at)
}

fn reduce_settings(state: &mut SettingsState, action: &SettingsAction) -> Vec<Effect> {
    let mut effects = Vec::new();
    match action {
        SettingsAction::RideEvent(RideEventSettingsAction::SetEnabled(enabled)) => {
            state.ride_event_settings.is_enabled = *enabled;
        }
        SettingsAction::RideEvent(RideEventSettingsAction::SetRadius(radius_km)) => {
            state.ride_event_settings.event_search_radius_km = *radius_km;
        }
        SettingsAction::SetColorScheme(scheme) => {
            state.appearance_settings.color_scheme = *scheme;
            effects.push(Effect::SetAppearance(*scheme));
        }
    }
    effects.push(Effect::SaveUserSettings(state.user_settings()));
    effects
}
