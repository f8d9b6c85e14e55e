//! Keyed debouncing.
//!
//! Scheduling under a key aborts whatever is still waiting under that key
//! and restarts the delay, so a burst of triggers fires once, carrying the
//! value from the last trigger.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct Debouncer<K> {
    pending: HashMap<K, JoinHandle<()>>,
}

impl<K> Default for Debouncer<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> Debouncer<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `action` through `sender` after `delay`, replacing any pending send under `key`.
    pub fn schedule<A: Send + 'static>(
        &mut self,
        key: K,
        delay: Duration,
        action: A,
        sender: &UnboundedSender<A>,
    ) {
        self.pending.retain(|_, handle| !handle.is_finished());
        if let Some(previous) = self.pending.remove(&key) {
            trace!(?key, "superseding pending debounce");
            previous.abort();
        }

        let sender = sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(action).is_err() {
                debug!("debounced action dropped, receiver closed");
            }
        });
        self.pending.insert(key, handle);
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for handle in self.pending.values() {
            handle.abort();
        }
    }
}
