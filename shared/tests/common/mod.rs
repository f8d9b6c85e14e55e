#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ride_shared::capabilities::{
    Capabilities, Environment, InMemorySettingsStore, InMemoryUserDefaults, ManualClock,
    NetworkError, RideApi, StaticDeviceId, UiAppearance,
};
use ride_shared::model::{
    ApiResponse, ChatMessage, ColorScheme, Coordinate, Location, LocationPost, Ride, Rider,
    UnixTimeMs,
};

pub const NOW: UnixTimeMs = UnixTimeMs(1_750_000_000_000);

#[derive(Default)]
pub struct StubApi {
    pub riders: Mutex<Option<NetworkError>>,
    pub chat: Mutex<Vec<ChatMessage>>,
    pub rides: Mutex<Vec<Ride>>,
    pub posts: Mutex<Vec<LocationPost>>,
    pub rider_fetches: AtomicUsize,
    pub chat_fetches: AtomicUsize,
    pub ride_fetches: AtomicUsize,
}

impl StubApi {
    pub fn fail_riders_with(&self, error: NetworkError) {
        *self.riders.lock().unwrap() = Some(error);
    }

    pub fn rider_fetches(&self) -> usize {
        self.rider_fetches.load(Ordering::SeqCst)
    }

    pub fn chat_fetches(&self) -> usize {
        self.chat_fetches.load(Ordering::SeqCst)
    }

    pub fn ride_fetches(&self) -> usize {
        self.ride_fetches.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<LocationPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl RideApi for StubApi {
    async fn fetch_rider_locations(&self) -> Result<Vec<Rider>, NetworkError> {
        self.rider_fetches.fetch_add(1, Ordering::SeqCst);
        match self.riders.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(vec![Rider {
                id: "rider-1".into(),
                coordinate: home().coordinate,
                timestamp: 1.0,
            }]),
        }
    }

    async fn fetch_chat_messages(&self) -> Result<Vec<ChatMessage>, NetworkError> {
        self.chat_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.chat.lock().unwrap().clone())
    }

    async fn post_rider_location(&self, post: &LocationPost) -> Result<ApiResponse, NetworkError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(ApiResponse {
            status: "ok".into(),
        })
    }

    async fn fetch_next_rides(
        &self,
        _coordinate: Coordinate,
        _radius_km: u32,
    ) -> Result<Vec<Ride>, NetworkError> {
        self.ride_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.rides.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct Appearance(pub Mutex<Vec<ColorScheme>>);

impl UiAppearance for Appearance {
    fn set_appearance(&self, scheme: ColorScheme) {
        self.0.lock().unwrap().push(scheme);
    }
}

/// Collaborators that outlive a single session.
pub struct Device {
    pub api: Arc<StubApi>,
    pub store: Arc<InMemorySettingsStore>,
    pub appearance: Arc<Appearance>,
    pub defaults: Arc<InMemoryUserDefaults>,
}

impl Device {
    pub fn new() -> Self {
        Self {
            api: Arc::new(StubApi::default()),
            store: Arc::new(InMemorySettingsStore::new()),
            appearance: Arc::new(Appearance::default()),
            defaults: Arc::new(InMemoryUserDefaults::default()),
        }
    }

    pub fn environment(&self) -> Environment {
        Environment::in_memory()
            .with_device_id(Arc::new(StaticDeviceId("phone-42".into())))
            .with_user_defaults(self.defaults.clone())
            .with_clock(Arc::new(ManualClock::new(NOW)))
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            api: self.api.clone(),
            settings: self.store.clone(),
            appearance: self.appearance.clone(),
            env: self.environment(),
        }
    }
}

pub fn home() -> Location {
    Location {
        coordinate: Coordinate::new(52.5200, 13.4050).unwrap(),
        timestamp: 1_750_000_000.0,
    }
}

pub fn message(timestamp: f64) -> ChatMessage {
    ChatMessage {
        identifier: format!("msg-{timestamp}"),
        device: "someone".into(),
        message: "on my way".into(),
        timestamp,
    }
}

pub fn upcoming_ride(id: u64, in_hours: u64) -> Ride {
    Ride {
        id,
        title: format!("Critical Mass #{id}"),
        coordinate: home().coordinate,
        starts_at: NOW.add_millis(in_hours * 3_600_000),
        location_name: Some("Mariannenplatz".into()),
    }
}
