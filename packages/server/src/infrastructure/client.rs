//! Client handle and its bounded outbound queue.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::ClientId;

/// Result of pushing one message onto a client's outbound queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Enqueued for the outbound pump
    Queued,
    /// Queue full: the message was dropped (drop-newest policy)
    Dropped,
    /// The outbound pump is gone
    Closed,
}

/// Cloneable handle to one connected client.
///
/// The connection, the Hub and every joined Room each hold a clone. Once all
/// clones are dropped the outbound queue closes and the outbound pump sends a
/// close frame.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    outbound: mpsc::Sender<String>,
}

impl ClientHandle {
    /// Create a handle with a fresh ID and an outbound queue of `capacity`.
    ///
    /// Returns the receiving end of the queue for the outbound pump.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id: ClientId::generate(),
            outbound,
        };
        (handle, rx)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Push `text` without waiting. A full queue drops `text`; the caller
    /// (a Room) is never blocked by a slow client.
    pub fn deliver(&self, text: String) -> Delivery {
        match self.outbound.try_send(text) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Outbound queue of client '{}' is full, dropping message", self.id);
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}
