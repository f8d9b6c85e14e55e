use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::UserSettings;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageError {
    #[error("no stored value")]
    NotFound,

    #[error("stored value is corrupted: {0}")]
    Corrupted(String),

    #[error("storage I/O failed: {0}")]
    Io(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupted(e.to_string())
    }
}

/// Persistence for [`UserSettings`]. The storage format belongs to the implementation.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_user_settings(&self) -> Result<UserSettings, StorageError>;

    async fn save_user_settings(&self, settings: &UserSettings) -> Result<(), StorageError>;
}

/// Small synchronous preferences the reducer reads directly.
pub trait UserDefaults: Send + Sync {
    fn did_show_observation_prompt(&self) -> bool;

    fn set_did_show_observation_prompt(&self, shown: bool);

    /// Timestamp (seconds since the Unix epoch) of the last chat message the rider has read.
    fn chat_read_watermark(&self) -> f64;
}

/// Settings store backed by a JSON document kept in memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    document: RwLock<Option<String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the raw document, e.g. to restore a snapshot written by a previous session.
    pub async fn set_document(&self, document: impl Into<String>) {
        *self.document.write().await = Some(document.into());
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load_user_settings(&self) -> Result<UserSettings, StorageError> {
        let document = self.document.read().await;
        let raw = document.as_deref().ok_or(StorageError::NotFound)?;
        Ok(serde_json::from_str(raw)?)
    }

    async fn save_user_settings(&self, settings: &UserSettings) -> Result<(), StorageError> {
        let raw = serde_json::to_string(settings)?;
        *self.document.write().await = Some(raw);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserDefaults {
    did_show_observation_prompt: AtomicBool,
    chat_read_watermark_bits: AtomicU64,
}

impl InMemoryUserDefaults {
    pub fn new(did_show_observation_prompt: bool, chat_read_watermark: f64) -> Self {
        Self {
            did_show_observation_prompt: AtomicBool::new(did_show_observation_prompt),
            chat_read_watermark_bits: AtomicU64::new(chat_read_watermark.to_bits()),
        }
    }

    pub fn set_chat_read_watermark(&self, watermark: f64) {
        self.chat_read_watermark_bits
            .store(watermark.to_bits(), Ordering::SeqCst);
    }
}

impl UserDefaults for InMemoryUserDefaults {
    fn did_show_observation_prompt(&self) -> bool {
        self.did_show_observation_prompt.load(Ordering::SeqCst)
    }

    fn set_did_show_observation_prompt(&self, shown: bool) {
        self.did_show_observation_prompt.store(shown, Ordering::SeqCst);
    }

    fn chat_read_watermark(&self) -> f64 {
        f64::from_bits(self.chat_read_watermark_bits.load(Ordering::SeqCst))
    }
}
