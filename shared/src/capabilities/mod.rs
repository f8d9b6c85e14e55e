//! Collaborator interfaces.
//!
//! Everything that performs raw I/O lives behind these traits. The reducer
//! only sees the synchronous read handles bundled in [`Environment`]; the
//! [`crate::Runtime`] additionally drives the async collaborators in
//! [`Capabilities`].

mod http;
mod kv;
mod platform;

use std::sync::Arc;

pub use self::http::{NetworkError, RideApi};
pub use self::kv::{
    InMemorySettingsStore, InMemoryUserDefaults, SettingsStore, StorageError, UserDefaults,
};
pub use self::platform::{
    Clock, DeviceIdProvider, ManualClock, NetworkMonitor, RandomDeviceId, SharedNetworkStatus,
    StaticDeviceId, SystemClock, UiAppearance,
};

/// Ambient values the reducer may read while planning effects.
#[derive(Clone)]
pub struct Environment {
    pub device_id: Arc<dyn DeviceIdProvider>,
    pub user_defaults: Arc<dyn UserDefaults>,
    pub network: Arc<dyn NetworkMonitor>,
    pub clock: Arc<dyn Clock>,
}

impl Environment {
    /// Environment with in-memory preferences, a fresh device id and the system clock.
    pub fn in_memory() -> Self {
        Self {
            device_id: Arc::new(RandomDeviceId::generate()),
            user_defaults: Arc::new(InMemoryUserDefaults::default()),
            network: Arc::new(SharedNetworkStatus::default()),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_user_defaults(mut self, user_defaults: Arc<dyn UserDefaults>) -> Self {
        self.user_defaults = user_defaults;
        self
    }

    #[must_use]
    pub fn with_device_id(mut self, device_id: Arc<dyn DeviceIdProvider>) -> Self {
        self.device_id = device_id;
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: Arc<dyn NetworkMonitor>) -> Self {
        self.network = network;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("network_available", &self.network.is_available())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct Capabilities {
    pub api: Arc<dyn RideApi>,
    pub settings: Arc<dyn SettingsStore>,
    pub appearance: Arc<dyn UiAppearance>,
    pub env: Environment,
}
