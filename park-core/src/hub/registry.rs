use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::model::ParkingSession;

/// Live observer connections, keyed by observer id.
///
/// Each observer is represented by the sending half of its outbound
/// channel; the connection task on the other end owns the socket. A send
/// failure means the connection task is gone, so the entry is pruned
/// during the same broadcast without disturbing the remaining observers.
pub struct ObserverRegistry {
    observers: RwLock<HashMap<Uuid, mpsc::UnboundedSender<ParkingSession>>>,
}

impl ObserverRegistry {
    pub(crate) fn new() -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) async fn register(
        &self,
        sender: mpsc::UnboundedSender<ParkingSession>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.observers.write().await.insert(id, sender);
        debug!("[{}] observer registered", id);
        id
    }

    pub(crate) async fn unregister(&self, id: &Uuid) -> bool {
        let removed = self.observers.write().await.remove(id).is_some();
        if removed {
            debug!("[{}] observer unregistered", id);
        }
        removed
    }

    pub(crate) async fn count(&self) -> usize {
        self.observers.read().await.len()
    }

    /// Deliver one event to every registered observer, dropping the ones
    /// whose connection has gone away.
    pub(crate) async fn broadcast(&self, session: &ParkingSession) {
        let mut dead = Vec::new();
        {
            let observers = self.observers.read().await;
            for (id, sender) in observers.iter() {
                if sender.send(session.clone()).is_err() {
                    dead.push(*id);
                }
            }
        }
        if !dead.is_empty() {
            let mut observers = self.observers.write().await;
            for id in dead {
                observers.remove(&id);
                warn!("[{}] observer dropped after failed delivery", id);
            }
        }
    }
}
