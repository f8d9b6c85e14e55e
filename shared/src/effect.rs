//! Side-effect descriptions returned by the reducer.
//!
//! Effects are values, not execution: [`crate::App::update`] only describes
//! what should happen and the [`crate::Runtime`] carries it out. Every
//! effect that produces a result reports it back as a new [`Action`].

use std::time::Duration;

use crate::action::Action;
use crate::fetch::FetchRequest;
use crate::model::{ColorScheme, Coordinate, LocationPost, UserSettings};

/// An action to dispatch after a delay.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedAction {
    pub after: Duration,
    pub action: Action,
}

impl TimedAction {
    pub fn new(after: Duration, action: Action) -> Self {
        Self { after, action }
    }

    pub fn immediately(action: Action) -> Self {
        Self::new(Duration::ZERO, action)
    }
}

/// Stable tokens for debounced effects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DebounceKey {
    RideEventRadiusChange,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Feed an action back into the queue.
    Send(Action),
    /// Run independent fetches concurrently, each reporting on its own.
    FanOut(Vec<FetchRequest>),
    PostLocation(LocationPost),
    FetchNextRides {
        coordinate: Coordinate,
        radius_km: u32,
    },
    LoadUserSettings,
    SaveUserSettings(UserSettings),
    SetAppearance(ColorScheme),
    PersistObservationPromptShown,
    /// Start the one-second tick source, replacing any running one.
    StartTimer,
    Delayed(TimedAction),
    /// Steps run one after another; each delay counts from the previous step.
    Sequence(Vec<TimedAction>),
    Debounce {
        key: DebounceKey,
        delay: Duration,
        action: Action,
    },
}

impl Effect {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Send(_) => "send",
            Self::FanOut(_) => "fan_out",
            Self::PostLocation(_) => "post_location",
            Self::FetchNextRides { .. } => "fetch_next_rides",
            Self::LoadUserSettings => "load_user_settings",
            Self::SaveUserSettings(_) => "save_user_settings",
            Self::SetAppearance(_) => "set_appearance",
            Self::PersistObservationPromptShown => "persist_observation_prompt_shown",
            Self::StartTimer => "start_timer",
            Self::Delayed(_) => "delayed",
            Self::Sequence(_) => "sequence",
            Self::Debounce { .. } => "debounce",
        }
    }

    /// Whether this effect talks to the ride API.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::FanOut(_) | Self::PostLocation(_) | Self::FetchNextRides { .. }
        )
    }
}
