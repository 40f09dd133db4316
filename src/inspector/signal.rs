//! Advance-signal bus.
//!
//! The advance signal is a payloadless notification meaning "the flow has
//! progressed; refresh your view". Any actor holding a bus handle may
//! broadcast it. Subscription is explicit so tests can drive transitions
//! deterministically, and dropping a subscription is the teardown.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

pub const DEFAULT_SIGNAL_BUFFER_CAPACITY: usize = 16;

/// Broadcast bus for advance signals.
#[derive(Debug, Clone)]
pub struct AdvanceBus {
    sender: broadcast::Sender<()>,
}

impl Default for AdvanceBus {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNAL_BUFFER_CAPACITY)
    }
}

impl AdvanceBus {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "signal buffer capacity must be greater than 0");
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a listener. Each subscription receives every signal
    /// broadcast after this call, until it is dropped.
    pub fn subscribe(&self) -> AdvanceSubscription {
        AdvanceSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Broadcast an advance signal. Returns the number of listeners it
    /// reached; zero when nobody is subscribed.
    pub fn notify(&self) -> usize {
        self.sender.send(()).unwrap_or(0)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// One registered listener on the advance bus.
///
/// Dropping the subscription removes the listener; subsequent broadcasts
/// no longer reach it.
#[derive(Debug)]
pub struct AdvanceSubscription {
    receiver: broadcast::Receiver<()>,
}

impl AdvanceSubscription {
    /// Wait for the next advance signal. Returns `false` once the bus is
    /// gone. A lagged receiver counts as one signal: missed broadcasts
    /// coalesce into a single refresh.
    pub async fn next(&mut self) -> bool {
        match self.receiver.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => true,
            Err(RecvError::Closed) => false,
        }
    }

    /// Drain any pending signals without blocking. Returns `true` if at
    /// least one signal was pending; bursts coalesce into one refresh.
    pub fn try_next(&mut self) -> bool {
        let mut signalled = false;
        loop {
            match self.receiver.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => signalled = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return signalled,
            }
        }
    }
}
