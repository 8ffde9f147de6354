//! Server configuration.

use std::time::Duration;

/// Maximum inbound message size in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 512;
/// Time allowed to read the next frame (or heartbeat acknowledgment) from the peer.
pub const DEFAULT_PONG_WAIT: Duration = Duration::from_secs(60);
/// Time allowed to write a frame to the peer.
pub const DEFAULT_WRITE_WAIT: Duration = Duration::from_secs(10);
/// Upper bound for the configurable waits, in seconds (one day).
pub const MAX_WAIT_SECS: u64 = 86_400;
/// Capacity of each client's outbound queue.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Runtime settings shared by the Hub, the Rooms and every connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Inbound messages larger than this close the connection
    pub max_message_size: usize,
    /// Read-liveness window, refreshed by every received frame
    pub pong_wait: Duration,
    /// Deadline for each write, including heartbeat probes
    pub write_wait: Duration,
    /// Bound of each client's outbound queue
    pub outbound_capacity: usize,
    /// Whether a broadcast is also delivered back to its sender
    pub echo_to_sender: bool,
}

impl ServerConfig {
    /// Heartbeat probe period: 90% of the liveness window.
    ///
    /// Divides first so that no `pong_wait` can overflow.
    pub fn ping_period(&self) -> Duration {
        self.pong_wait / 10 * 9
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            pong_wait: DEFAULT_PONG_WAIT,
            write_wait: DEFAULT_WRITE_WAIT,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            echo_to_sender: true,
        }
    }
}
