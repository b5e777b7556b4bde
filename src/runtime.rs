//! Store runtime: executes the state machine and its effects

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::StoreRuntime;
pub use traits::Gateway;

use crate::store::{Event, StoreState};
use tokio::sync::{broadcast, mpsc};

/// Updates broadcast to view subscribers.
#[derive(Debug, Clone)]
pub enum StoreUpdate {
    /// Snapshot after an applied transition.
    State(StoreState),
    /// The store requests navigation; the router echoes it back as
    /// `Event::RouteChanged`.
    NavigationRequested { conversation_id: String },
    /// A rejected command or a failed remote operation, for in-place
    /// display. Status flags in the snapshot carry the durable signal.
    Error { message: String },
}

/// Handle to interact with a running store runtime.
#[derive(Clone)]
pub struct StoreHandle {
    pub event_tx: mpsc::Sender<Event>,
    pub update_tx: broadcast::Sender<StoreUpdate>,
}

impl StoreHandle {
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.event_tx.send(event).await {
            tracing::error!(error = %e, "Store runtime is gone");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }
}
