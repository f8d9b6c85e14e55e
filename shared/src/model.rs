use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::capabilities::NetworkError;
use crate::navigation::{BottomSheetPosition, Route};
use crate::AppError;

/// Explicit timestamp unit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    pub fn now() -> Self {
        Self(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
        )
    }

    #[must_use]
    pub fn add_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// Validated lat/lon
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() { return None; }
        if !(-90.0..=90.0).contains(&latitude) { return None; }
        if !(-180.0..=180.0).contains(&longitude) { return None; }
        Some(Self { latitude, longitude })
    }
}

/// A resolved device location. `timestamp` is seconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    pub timestamp: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub id: String,
    pub coordinate: Coordinate,
    pub timestamp: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub identifier: String,
    pub device: String,
    pub message: String,
    /// Seconds since the Unix epoch, compared against the read watermark.
    pub timestamp: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub id: u64,
    pub title: String,
    pub coordinate: Coordinate,
    pub starts_at: UnixTimeMs,
    pub location_name: Option<String>,
}

/// Body of a location post. `location` is `None` until the device has resolved one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationPost {
    pub device: String,
    pub location: Option<Location>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceSettings {
    pub color_scheme: ColorScheme,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideEventSettings {
    pub is_enabled: bool,
    pub event_search_radius_km: u32,
}

impl Default for RideEventSettings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            event_search_radius_km: crate::DEFAULT_EVENT_SEARCH_RADIUS_KM,
        }
    }
}

/// Persisted user settings, as returned by the settings store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub is_observation_mode_enabled: bool,
    pub ride_event_settings: RideEventSettings,
    pub appearance_settings: AppearanceSettings,
}

// --- Child sub-states ---

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestTimerState {
    pub seconds_elapsed: u32,
    pub is_timer_active: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub is_initialized: bool,
    pub riders: Vec<Rider>,
    pub location: Option<Location>,
    pub visible_riders_count: Option<usize>,
    pub focused_coordinate: Option<Coordinate>,

    // Ride event overlay
    pub ride_events: Vec<Ride>,
    pub event_center: Option<Coordinate>,

    pub next_ride: Option<Ride>,
    pub is_next_ride_banner_visible: bool,
    pub is_next_ride_banner_expanded: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NextRideState {
    pub ride_event_settings: RideEventSettings,
    pub user_location: Option<Coordinate>,
    pub ride_events: Vec<Ride>,
    pub next_ride: Option<Ride>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsState {
    pub is_observation_mode_enabled: bool,
    pub ride_event_settings: RideEventSettings,
    pub appearance_settings: AppearanceSettings,
}

impl SettingsState {
    pub fn user_settings(&self) -> UserSettings {
        UserSettings {
            is_observation_mode_enabled: self.is_observation_mode_enabled,
            ride_event_settings: self.ride_event_settings.clone(),
            appearance_settings: self.appearance_settings.clone(),
        }
    }
}

impl From<UserSettings> for SettingsState {
    fn from(settings: UserSettings) -> Self {
        Self {
            is_observation_mode_enabled: settings.is_observation_mode_enabled,
            ride_event_settings: settings.ride_event_settings,
            appearance_settings: settings.appearance_settings,
        }
    }
}

/// In-place error display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorState {
    pub title: String,
    pub body: String,
    pub error: Option<AppError>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ChatMessages {
    #[default]
    Loading,
    Results(Vec<ChatMessage>),
    Error(ErrorState),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    pub messages: ChatMessages,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialState {
    pub chat: ChatState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertButton {
    pub label: String,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertSpec {
    pub title: String,
    pub message: String,
    pub buttons: Vec<AlertButton>,
}

/// Session state. Only [`crate::App::update`] mutates it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub rider_locations: Option<Result<Vec<Rider>, NetworkError>>,
    pub is_requesting_rider_locations: bool,
    pub did_resolve_initial_location: bool,

    // Children
    pub map: MapState,
    pub social: SocialState,
    pub settings: SettingsState,
    pub next_ride: NextRideState,
    pub request_timer: RequestTimerState,

    // Navigation
    pub route: Option<Route>,
    pub bottom_sheet_position: BottomSheetPosition,
    pub alert: Option<AlertSpec>,

    pub chat_message_badge_count: u32,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_chat_presented(&self) -> bool {
        self.route == Some(Route::Chat)
    }

    /// Coordinate of the last resolved device location, if any.
    pub fn current_coordinate(&self) -> Option<Coordinate> {
        self.map.location.map(|location| location.coordinate)
    }
}
