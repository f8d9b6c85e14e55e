use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use uuid::Uuid;

use crate::model::{ColorScheme, UnixTimeMs};

pub trait DeviceIdProvider: Send + Sync {
    fn id(&self) -> String;
}

/// Device identifier generated once per instance.
#[derive(Debug, Clone)]
pub struct RandomDeviceId(String);

impl RandomDeviceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RandomDeviceId {
    fn default() -> Self {
        Self::generate()
    }
}

impl DeviceIdProvider for RandomDeviceId {
    fn id(&self) -> String {
        self.0.clone()
    }
}

/// Device identifier supplied by the shell, e.g. restored from the keystore.
#[derive(Debug, Clone)]
pub struct StaticDeviceId(pub String);

impl DeviceIdProvider for StaticDeviceId {
    fn id(&self) -> String {
        self.0.clone()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> UnixTimeMs;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimeMs {
        UnixTimeMs::now()
    }
}

/// Clock advanced explicitly, for simulation.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(now: UnixTimeMs) -> Self {
        Self(AtomicU64::new(now.0))
    }

    pub fn advance_millis(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimeMs {
        UnixTimeMs(self.0.load(Ordering::SeqCst))
    }
}

/// Reachability as last reported by the platform.
pub trait NetworkMonitor: Send + Sync {
    fn is_available(&self) -> bool;
}

#[derive(Debug)]
pub struct SharedNetworkStatus(AtomicBool);

impl SharedNetworkStatus {
    pub fn new(available: bool) -> Self {
        Self(AtomicBool::new(available))
    }

    pub fn set_available(&self, available: bool) {
        self.0.store(available, Ordering::SeqCst);
    }
}

impl Default for SharedNetworkStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NetworkMonitor for SharedNetworkStatus {
    fn is_available(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Applies the interface style chosen in settings.
pub trait UiAppearance: Send + Sync {
    fn set_appearance(&self, scheme: ColorScheme);
}
