//! One-shot prompts gated by a persisted flag.

use std::time::Duration;

use crate::action::Action;
use crate::effect::{Effect, TimedAction};
use crate::model::{AlertButton, AlertSpec};

/// Schedule `action` after `delay` unless the gate was already set.
///
/// The gate is checked here only; setting it after scheduling does not
/// cancel the pending prompt.
pub fn schedule_once(already_shown: bool, delay: Duration, action: Action) -> Option<Effect> {
    (!already_shown).then(|| Effect::Delayed(TimedAction::new(delay, action)))
}

impl AlertSpec {
    pub fn observation_mode() -> Self {
        Self {
            title: "Observation mode".into(),
            message: "Are you riding along right now, or just watching the map? \
                      While watching, your location is not shared."
                .into(),
            buttons: vec![
                AlertButton {
                    label: "Riding".into(),
                    action: Action::SetObservationMode(false),
                },
                AlertButton {
                    label: "Watching".into(),
                    action: Action::SetObservationMode(true),
                },
            ],
        }
    }
}
