//! Values derived from the [`Model`] on demand. Nothing here is stored.

use serde::{Deserialize, Serialize};

use crate::model::{AlertSpec, ChatMessages, Model, Ride};
use crate::navigation::{BottomSheetPosition, Route};
use crate::{CYCLE_SECONDS, POST_LOCATION_SECOND};

/// Fraction of the current request cycle that has elapsed, in [0, 1).
pub fn timer_progress(seconds_elapsed: u32) -> f64 {
    f64::from(seconds_elapsed) / f64::from(CYCLE_SECONDS)
}

pub fn send_location_now(seconds_elapsed: u32) -> bool {
    seconds_elapsed == POST_LOCATION_SECOND
}

/// Seconds left until the next rider refresh.
pub fn timer_countdown_text(seconds_elapsed: u32) -> String {
    CYCLE_SECONDS.saturating_sub(seconds_elapsed).to_string()
}

/// Visible rider count grouped with `.` every three digits, `0` when unknown.
pub fn riders_count_text(count: Option<usize>) -> String {
    let digits = count.unwrap_or(0).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn has_offline_error(model: &Model) -> bool {
    matches!(&model.rider_locations, Some(Err(error)) if error.is_connection_lost())
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChatView {
    Loading,
    Messages { count: usize },
    Error { title: String, body: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub timer_progress: f64,
    pub timer_countdown_text: String,
    pub send_location_now: bool,
    pub riders_count_text: String,
    pub has_offline_error: bool,
    pub is_requesting_rider_locations: bool,
    pub is_observation_mode_enabled: bool,
    pub chat_message_badge_count: u32,
    pub route: Option<Route>,
    pub bottom_sheet_position: BottomSheetPosition,
    pub alert: Option<AlertSpec>,
    pub chat: ChatView,
    pub next_ride: Option<Ride>,
    pub is_next_ride_banner_visible: bool,
    pub is_next_ride_banner_expanded: bool,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let seconds = model.request_timer.seconds_elapsed;
        let chat = match &model.social.chat.messages {
            ChatMessages::Loading => ChatView::Loading,
            ChatMessages::Results(messages) => ChatView::Messages {
                count: messages.len(),
            },
            ChatMessages::Error(state) => ChatView::Error {
                title: state.title.clone(),
                body: state.body.clone(),
            },
        };

        Self {
            timer_progress: timer_progress(seconds),
            timer_countdown_text: timer_countdown_text(seconds),
            send_location_now: send_location_now(seconds),
            riders_count_text: riders_count_text(model.map.visible_riders_count),
            has_offline_error: has_offline_error(model),
            is_requesting_rider_locations: model.is_requesting_rider_locations,
            is_observation_mode_enabled: model.settings.is_observation_mode_enabled,
            chat_message_badge_count: model.chat_message_badge_count,
            route: model.route,
            bottom_sheet_position: model.bottom_sheet_position,
            alert: model.alert.clone(),
            chat,
            next_ride: model.map.next_ride.clone(),
            is_next_ride_banner_visible: model.map.is_next_ride_banner_visible,
            is_next_ride_banner_expanded: model.map.is_next_ride_banner_expanded,
        }
    }
}
