//! Overlay routing and bottom sheet state.
//!
//! The presented route and the bottom sheet position are independent. The
//! ride-event overlay on the map follows the sheet: it is visible only
//! while the sheet is.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::effect::Effect;
use crate::model::Model;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Chat,
    Rules,
    Settings,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum BottomSheetPosition {
    #[default]
    Hidden,
    /// Fraction of the screen height, in (0, 1].
    Relative(f64),
}

impl BottomSheetPosition {
    /// Validated relative position. Returns `None` outside (0, 1].
    pub fn relative(fraction: f64) -> Option<Self> {
        (fraction > 0.0 && fraction <= 1.0).then_some(Self::Relative(fraction))
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

pub fn set_route(model: &mut Model, route: Option<Route>) {
    model.route = route;
    match route {
        Some(Route::Chat) => model.chat_message_badge_count = 0,
        None if model.bottom_sheet_position.is_hidden() => clear_ride_event_overlay(model),
        _ => {}
    }
}

pub fn set_bottom_sheet_position(model: &mut Model, position: BottomSheetPosition) {
    model.bottom_sheet_position = position;
    sync_ride_event_overlay(model);
}

/// Bring the map overlay in line with the sheet.
pub fn sync_ride_event_overlay(model: &mut Model) {
    if model.bottom_sheet_position.is_hidden() {
        clear_ride_event_overlay(model);
    } else {
        model.map.ride_events = model.next_ride.ride_events.clone();
        model.map.event_center = model.next_ride.user_location;
    }
}

fn clear_ride_event_overlay(model: &mut Model) {
    model.map.ride_events.clear();
    model.map.event_center = None;
}

/// Raise the sheet to `height` when a ride gets focus, unless it is hidden.
pub fn expand_for_focus(model: &Model, height: f64) -> Vec<Effect> {
    if model.bottom_sheet_position.is_hidden() {
        return Vec::new();
    }
    BottomSheetPosition::relative(height)
        .map(|position| vec![Effect::Send(Action::SetBottomSheetPosition(position))])
        .unwrap_or_default()
}
