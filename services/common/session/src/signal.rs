use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

const SIGNAL_CAPACITY: usize = 16;

/// "Storage changed, re-check now". Carries no session data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub origin: Uuid,
}

/// Cross-context notification bus shared by every gate that reads the same
/// credential slot. Clones publish to and subscribe from the same channel.
#[derive(Debug, Clone)]
pub struct StorageSignal {
    sender: broadcast::Sender<StorageChange>,
}

impl Default for StorageSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { sender }
    }

    pub fn notify(&self, key: &str, origin: Uuid) {
        let change = StorageChange {
            key: key.to_owned(),
            origin,
        };
        // No subscribers is fine: no sibling context is listening.
        let receivers = self.sender.send(change).unwrap_or(0);
        trace!(key, %origin, receivers, "storage change broadcast");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.sender.subscribe()
    }
}
