use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ApiResponse, ChatMessage, Coordinate, LocationPost, Ride, Rider};

/// Failures reported by the ride API.
///
/// `ConnectionLost` is kept distinct from other transport failures because
/// the core surfaces it as the offline flag.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkError {
    #[error("the network connection was lost")]
    ConnectionLost,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with status {status}")]
    Server { status: u16 },

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl NetworkError {
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::ConnectionLost)
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Network collaborator. Implementations own transport and wire format.
#[async_trait]
pub trait RideApi: Send + Sync {
    async fn fetch_rider_locations(&self) -> Result<Vec<Rider>, NetworkError>;

    async fn fetch_chat_messages(&self) -> Result<Vec<ChatMessage>, NetworkError>;

    async fn post_rider_location(&self, post: &LocationPost) -> Result<ApiResponse, NetworkError>;

    async fn fetch_next_rides(
        &self,
        coordinate: Coordinate,
        radius_km: u32,
    ) -> Result<Vec<Ride>, NetworkError>;
}
