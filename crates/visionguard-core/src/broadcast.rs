//! Fan-out of timer snapshots to observers.

use tokio::sync::broadcast;

use crate::timer::StatusSnapshot;

const CHANNEL_CAPACITY: usize = 64;

/// Delivers every published snapshot to all live subscribers and remembers
/// the latest one for on-demand queries.
///
/// A subscriber is torn down by dropping its receiver; publishing with no
/// subscribers is not an error.
#[derive(Debug)]
pub struct StatusBroadcast {
    tx: broadcast::Sender<StatusSnapshot>,
    latest: StatusSnapshot,
}

impl StatusBroadcast {
    pub fn new(initial: StatusSnapshot) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            latest: initial,
        }
    }

    pub fn publish(&mut self, snapshot: StatusSnapshot) {
        self.latest = snapshot;
        // Err only means nobody is listening.
        let delivered = self.tx.send(snapshot).unwrap_or(0);
        tracing::trace!(delivered, remaining = snapshot.seconds_remaining, "status published");
    }

    pub fn latest(&self) -> StatusSnapshot {
        self.latest
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
