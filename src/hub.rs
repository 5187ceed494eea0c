//! Fan-out of generated samples to every connected subscriber.
//!
//! The hub wraps a tokio broadcast channel. Publishing never waits for
//! subscribers: each subscription has its own cursor into a bounded ring, so a
//! slow subscriber falls behind (and skips the samples it missed) without
//! holding up anyone else. Samples published by one generator reach every
//! subscriber in the order they were published.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::Sample;

/// Default number of samples buffered per subscriber before it starts lagging
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<Sample>,
    next_id: Arc<AtomicU64>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a new subscriber.
    ///
    /// The subscription only sees samples published after this call returns.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let receiver = self.sender.subscribe();
        debug!(
            "subscriber {id} connected ({} active)",
            self.sender.receiver_count()
        );
        Subscription { id, receiver }
    }

    /// Remove a subscriber. Dropping the subscription has the same effect.
    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
    }

    /// Deliver `sample` to every current subscriber.
    ///
    /// Returns the number of subscribers the sample was queued for. Having no
    /// subscribers is not an error.
    pub fn publish(&self, sample: Sample) -> usize {
        let location = sample.location.clone();
        match self.sender.send(sample) {
            Ok(receivers) => {
                trace!("published sample for {location} to {receivers} subscribers");
                receivers
            }
            Err(_) => {
                trace!("no subscribers for sample from {location}");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A registered listener on the [`BroadcastHub`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: broadcast::Receiver<Sample>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next sample.
    ///
    /// If this subscriber fell behind, the skipped samples are logged and
    /// reception continues with the oldest sample still buffered. Returns
    /// `None` once the hub has been dropped.
    pub async fn recv(&mut self) -> Option<Sample> {
        loop {
            match self.receiver.recv().await {
                Ok(sample) => return Some(sample),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("subscriber {} lagged, skipped {skipped} samples", self.id);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Return a sample if one is already buffered, without waiting.
    pub fn try_recv(&mut self) -> Option<Sample> {
        loop {
            match self.receiver.try_recv() {
                Ok(sample) => return Some(sample),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("subscriber {} lagged, skipped {skipped} samples", self.id);
                }
                Err(_) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("subscriber {} disconnected", self.id);
    }
}
