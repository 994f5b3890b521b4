use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Tuning for the per-room actors.
#[derive(Debug, Clone, Copy)]
pub struct RoomConfig {
    /// Bounded mailbox size of every room actor.
    pub mailbox_capacity: usize,
    /// How many times a command is re-routed when it lands on a retiring room.
    pub dispatch_attempts: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 256,
            dispatch_attempts: 8,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Delay before the n-th retry is `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory holding one JSON record per room. `None` keeps rooms in memory only.
    pub data_dir: Option<PathBuf>,
    pub room: RoomConfig,
    pub store_retry: RetryPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8787)),
            data_dir: None,
            room: RoomConfig::default(),
            store_retry: RetryPolicy::default(),
        }
    }
}
