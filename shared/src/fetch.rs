//! Concurrent fetch orchestration.
//!
//! A fan-out launches every request at once. Each request reports its own
//! completion action, so one failing fetch never hides the others.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::action::Action;
use crate::capabilities::RideApi;
use crate::effect::Effect;
use crate::model::Model;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchRequest {
    RiderLocations,
    ChatMessages,
}

impl FetchRequest {
    pub const fn name(self) -> &'static str {
        match self {
            Self::RiderLocations => "rider_locations",
            Self::ChatMessages => "chat_messages",
        }
    }
}

/// Plan a fan-out effect. Returns `None` when there is nothing to fetch.
pub fn plan_fan_out(model: &mut Model, requests: Vec<FetchRequest>) -> Option<Effect> {
    if requests.is_empty() {
        return None;
    }
    if requests.contains(&FetchRequest::RiderLocations) {
        model.is_requesting_rider_locations = true;
    }
    Some(Effect::FanOut(requests))
}

async fn perform(api: &dyn RideApi, request: FetchRequest) -> Action {
    match request {
        FetchRequest::RiderLocations => {
            Action::FetchLocationsResponse(api.fetch_rider_locations().await)
        }
        FetchRequest::ChatMessages => {
            Action::FetchChatMessagesResponse(api.fetch_chat_messages().await)
        }
    }
}

/// Run all requests concurrently and send each result as it arrives.
#[instrument(skip(api, sender))]
pub async fn fan_out(
    api: Arc<dyn RideApi>,
    requests: Vec<FetchRequest>,
    sender: UnboundedSender<Action>,
) {
    let mut tasks = JoinSet::new();
    for request in requests {
        let api = api.clone();
        let sender = sender.clone();
        tasks.spawn(async move {
            let action = perform(api.as_ref(), request).await;
            if sender.send(action).is_err() {
                debug!(request = request.name(), "runtime gone, dropping fetch result");
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "fetch task failed");
        }
    }
}
