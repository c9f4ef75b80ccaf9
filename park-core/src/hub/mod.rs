mod registry;

use registry::ObserverRegistry;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::model::ParkingSession;

/// Default capacity of the publish queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// In-process broadcaster decoupling session writers from observers.
///
/// `publish` pushes onto a bounded queue and returns immediately; a
/// single delivery task drains the queue in publish order and hands each
/// event to the registry. The store commit always happens before the
/// publish, so a dropped event loses nothing durable - observers are a
/// best-effort live view, not a source of truth.
///
/// The handle clones cheaply and is the only way to reach the registry.
#[derive(Clone)]
pub struct NotificationHub {
    sender: mpsc::Sender<ParkingSession>,
    registry: Arc<ObserverRegistry>,
}

impl NotificationHub {
    /// Create the hub and spawn its delivery task
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        let registry = Arc::new(ObserverRegistry::new());
        tokio::spawn(Self::deliver(receiver, Arc::clone(&registry)));
        Self { sender, registry }
    }

    async fn deliver(
        mut receiver: mpsc::Receiver<ParkingSession>,
        registry: Arc<ObserverRegistry>,
    ) {
        info!("notification delivery task started");
        while let Some(event) = receiver.recv().await {
            registry.broadcast(&event).await;
        }
        info!("notification delivery task stopped");
    }

    /// Enqueue an event for fan-out. Never blocks and never fails the
    /// caller: a full queue drops the event with a warning.
    pub fn publish(&self, session: ParkingSession) {
        match self.sender.try_send(session) {
            Ok(()) => {}
            Err(TrySendError::Full(session)) => {
                warn!(
                    "notification queue full, dropping update for plate '{}'",
                    session.plate
                );
            }
            Err(TrySendError::Closed(session)) => {
                warn!(
                    "delivery task gone, dropping update for plate '{}'",
                    session.plate
                );
            }
        }
    }

    /// Register an observer's outbound channel; the returned id is the
    /// handle for deregistration.
    pub async fn register_observer(
        &self,
        sender: mpsc::UnboundedSender<ParkingSession>,
    ) -> Uuid {
        self.registry.register(sender).await
    }

    pub async fn unregister_observer(&self, id: &Uuid) -> bool {
        self.registry.unregister(id).await
    }

    pub async fn observer_count(&self) -> usize {
        self.registry.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionStatus;
    use std::time::Duration;

    fn event(plate: &str) -> ParkingSession {
        ParkingSession {
            id: 1,
            plate: plate.to_string(),
            park_lot: "P1".to_string(),
            start_time: "2024-01-01 10:00:00".to_string(),
            end_time: Some("2024-01-01 10:30:00".to_string()),
            status: SessionStatus::Exited,
            duration_minutes: Some(30),
            fee: Some(300.0),
            closed_by: None,
            close_reason: None,
            photo_ref: None,
        }
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let hub = NotificationHub::new(DEFAULT_QUEUE_CAPACITY);
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register_observer(tx).await;

        hub.publish(event("E1"));
        hub.publish(event("E2"));

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.plate, "E1");
        assert_eq!(second.plate, "E2");
    }

    #[tokio::test]
    async fn poisoned_observer_does_not_block_the_rest() {
        let hub = NotificationHub::new(DEFAULT_QUEUE_CAPACITY);

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        hub.register_observer(tx_a).await;
        hub.register_observer(tx_dead).await;
        hub.register_observer(tx_b).await;
        drop(rx_dead);

        hub.publish(event("E1"));

        assert_eq!(rx_a.recv().await.unwrap().plate, "E1");
        assert_eq!(rx_b.recv().await.unwrap().plate, "E1");

        // the broken connection was pruned during delivery
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hub.observer_count().await, 2);
    }

    #[tokio::test]
    async fn late_observers_get_no_replay() {
        let hub = NotificationHub::new(DEFAULT_QUEUE_CAPACITY);

        hub.publish(event("E1"));
        // let the delivery task drain the queue with nobody listening
        tokio::time::sleep(Duration::from_millis(20)).await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.register_observer(tx).await;
        hub.publish(event("E2"));

        assert_eq!(rx.recv().await.unwrap().plate, "E2");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_stops_delivery() {
        let hub = NotificationHub::new(DEFAULT_QUEUE_CAPACITY);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register_observer(tx).await;
        assert_eq!(hub.observer_count().await, 1);

        assert!(hub.unregister_observer(&id).await);
        assert_eq!(hub.observer_count().await, 0);

        hub.publish(event("E1"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn registration_races_with_broadcast() {
        let hub = NotificationHub::new(DEFAULT_QUEUE_CAPACITY);

        let mut tasks = Vec::new();
        for i in 0..8 {
            let hub = hub.clone();
            tasks.push(tokio::spawn(async move {
                let (tx, rx) = mpsc::unbounded_channel();
                let id = hub.register_observer(tx).await;
                hub.publish(event(&format!("E{i}")));
                hub.unregister_observer(&id).await;
                drop(rx);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        // registry must end up consistent, not corrupted
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hub.observer_count().await, 0);
    }
}
