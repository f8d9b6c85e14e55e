use serde::{Deserialize, Serialize};

use crate::capabilities::{NetworkError, StorageError};
use crate::model::{
    ApiResponse, ChatMessage, ColorScheme, Coordinate, Location, Ride, Rider, UserSettings,
};
use crate::navigation::{BottomSheetPosition, Route};

/// Every input the core reacts to: user intents, timer ticks, collaborator
/// results and actions forwarded from the child features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    OnAppear,
    OnDisappear,

    FetchLocations,
    FetchLocationsResponse(Result<Vec<Rider>, NetworkError>),
    PostLocation,
    PostLocationResponse(Result<ApiResponse, NetworkError>),
    FetchChatMessages,
    FetchChatMessagesResponse(Result<Vec<ChatMessage>, NetworkError>),
    UserSettingsLoaded(Result<UserSettings, StorageError>),

    OnRideSelectedFromBottomSheet(Ride),
    SetNavigation(Option<Route>),
    SetBottomSheetPosition(BottomSheetPosition),
    DismissSheetView,

    PresentObservationModeAlert,
    SetObservationMode(bool),
    DismissAlert,

    // Child features
    Map(MapAction),
    NextRide(NextRideAction),
    Timer(TimerAction),
    Settings(SettingsAction),
    Social(SocialAction),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MapAction {
    OnAppear,
    FocusRideEvent(Coordinate),
    FocusNextRide(Coordinate),
    SetNextRideBannerVisible(bool),
    SetNextRideBannerExpanded(bool),
    LocationUpdated(Location),
    SetVisibleRidersCount(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NextRideAction {
    GetNextRide(Coordinate),
    NextRidesResponse(Result<Vec<Ride>, NetworkError>),
    SetNextRide(Ride),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    StartTimer,
    TimerTicked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsAction {
    RideEvent(RideEventSettingsAction),
    SetColorScheme(ColorScheme),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideEventSettingsAction {
    SetEnabled(bool),
    SetRadius(u32),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialAction {
    Chat(ChatAction),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatAction {
    OnAppear,
}

impl Action {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OnAppear => "on_appear",
            Self::OnDisappear => "on_disappear",
            Self::FetchLocations => "fetch_locations",
            Self::FetchLocationsResponse(_) => "fetch_locations_response",
            Self::PostLocation => "post_location",
            Self::PostLocationResponse(_) => "post_location_response",
            Self::FetchChatMessages => "fetch_chat_messages",
            Self::FetchChatMessagesResponse(_) => "fetch_chat_messages_response",
            Self::UserSettingsLoaded(_) => "user_settings_loaded",
            Self::OnRideSelectedFromBottomSheet(_) => "on_ride_selected_from_bottom_sheet",
            Self::SetNavigation(_) => "set_navigation",
            Self::SetBottomSheetPosition(_) => "set_bottom_sheet_position",
            Self::DismissSheetView => "dismiss_sheet_view",
            Self::PresentObservationModeAlert => "present_observation_mode_alert",
            Self::SetObservationMode(_) => "set_observation_mode",
            Self::DismissAlert => "dismiss_alert",
            Self::Map(action) => match action {
                MapAction::OnAppear => "map.on_appear",
                MapAction::FocusRideEvent(_) => "map.focus_ride_event",
                MapAction::FocusNextRide(_) => "map.focus_next_ride",
                MapAction::SetNextRideBannerVisible(_) => "map.set_next_ride_banner_visible",
                MapAction::SetNextRideBannerExpanded(_) => "map.set_next_ride_banner_expanded",
                MapAction::LocationUpdated(_) => "map.location_updated",
                MapAction::SetVisibleRidersCount(_) => "map.set_visible_riders_count",
            },
            Self::NextRide(action) => match action {
                NextRideAction::GetNextRide(_) => "next_ride.get_next_ride",
                NextRideAction::NextRidesResponse(_) => "next_ride.next_rides_response",
                NextRideAction::SetNextRide(_) => "next_ride.set_next_ride",
            },
            Self::Timer(TimerAction::StartTimer) => "timer.start_timer",
            Self::Timer(TimerAction::TimerTicked) => "timer.timer_ticked",
            Self::Settings(SettingsAction::RideEvent(_)) => "settings.ride_event",
            Self::Settings(SettingsAction::SetColorScheme(_)) => "settings.set_color_scheme",
            Self::Social(SocialAction::Chat(ChatAction::OnAppear)) => "social.chat.on_appear",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::OnRideSelectedFromBottomSheet(_)
                | Self::SetNavigation(_)
                | Self::SetBottomSheetPosition(_)
                | Self::DismissSheetView
                | Self::SetObservationMode(_)
                | Self::DismissAlert
                | Self::Settings(_)
        )
    }
}
