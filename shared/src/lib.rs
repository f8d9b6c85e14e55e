//! Shared coordination core for the group-ride app.
//!
//! The crate owns the application [`Model`], interprets [`Action`]s through
//! the pure [`App::update`] reducer and describes every side effect as an
//! [`Effect`] value. The [`Runtime`] actor is the single owner of the model:
//! it serialises actions, executes effects against the [`Capabilities`]
//! collaborators and feeds their results back as new actions.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod action;
pub mod app;
pub mod badge;
pub mod capabilities;
pub mod children;
pub mod config;
pub mod debounce;
pub mod effect;
pub mod fetch;
pub mod model;
pub mod navigation;
pub mod projection;
pub mod prompt;
pub mod runtime;
pub mod timer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use action::Action;
pub use app::App;
pub use capabilities::{Capabilities, Environment};
pub use config::CoreConfig;
pub use effect::Effect;
pub use model::Model;
pub use projection::ViewModel;
pub use runtime::{Runtime, RuntimeHandle};

/// Length of one request cycle, in timer ticks.
pub const CYCLE_SECONDS: u32 = 60;
/// Tick within the cycle at which the device location is posted.
pub const POST_LOCATION_SECOND: u32 = 30;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const OBSERVATION_PROMPT_DELAY: Duration = Duration::from_secs(3);
pub const RIDE_EVENT_RADIUS_DEBOUNCE: Duration = Duration::from_secs(2);
pub const BANNER_EXPAND_DELAY: Duration = Duration::from_secs(1);
pub const BANNER_COLLAPSE_DELAY: Duration = Duration::from_secs(8);
/// Relative bottom sheet height used when the map focuses a ride.
pub const FOCUSED_SHEET_HEIGHT: f64 = 0.4;
pub const DEFAULT_EVENT_SEARCH_RADIUS_KM: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ConnectionLost,
    Network,
    Server,
    Decode,
    Storage,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConnectionLost => "CONNECTION_LOST",
            Self::Network => "NETWORK_ERROR",
            Self::Server => "SERVER_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::Storage => "STORAGE_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// Error value kept in the model for display.
///
/// Collaborator errors are converted into this shape when they have to be
/// shown to the rider; everything else stays in the typed collaborator error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::ConnectionLost => {
                "You appear to be offline. Riders will refresh once the connection is back.".into()
            }
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection.".into()
            }
            ErrorKind::Server => "The server is having trouble. Please try again later.".into(),
            ErrorKind::Decode => {
                "Received unexpected data. Please contact support if this persists.".into()
            }
            ErrorKind::Storage => "Unable to read local data.".into(),
            ErrorKind::Unknown => "An unexpected error occurred.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<&capabilities::NetworkError> for AppError {
    fn from(e: &capabilities::NetworkError) -> Self {
        use capabilities::NetworkError;

        let kind = match e {
            NetworkError::ConnectionLost => ErrorKind::ConnectionLost,
            NetworkError::Transport(_) => ErrorKind::Network,
            NetworkError::Server { .. } => ErrorKind::Server,
            NetworkError::Decode(_) => ErrorKind::Decode,
        };
        let error = Self::new(kind, e.to_string());
        match e {
            NetworkError::Server { status } => error.with_context("http_status", status.to_string()),
            _ => error,
        }
    }
}

impl From<&capabilities::StorageError> for AppError {
    fn from(e: &capabilities::StorageError) -> Self {
        Self::new(ErrorKind::Storage, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{NetworkError, StorageError};

    #[test]
    fn connection_lost_maps_to_its_own_kind() {
        let error = AppError::from(&NetworkError::ConnectionLost);
        assert_eq!(error.kind, ErrorKind::ConnectionLost);
        assert_eq!(error.code(), "CONNECTION_LOST");
    }

    #[test]
    fn server_errors_keep_status_context() {
        let error = AppError::from(&NetworkError::Server { status: 503 });
        assert_eq!(error.kind, ErrorKind::Server);
        assert_eq!(error.context.get("http_status").map(String::as_str), Some("503"));
    }

    #[test]
    fn storage_errors_are_storage_kind() {
        let error = AppError::from(&StorageError::NotFound);
        assert_eq!(error.kind, ErrorKind::Storage);
    }

    #[test]
    fn display_includes_internal_message() {
        let error = AppError::new(ErrorKind::Unknown, "boom").with_internal("stack");
        assert_eq!(error.to_string(), "[UNKNOWN_ERROR] boom (internal: stack)");
    }
}
