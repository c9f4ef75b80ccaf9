use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::billing;
use crate::error::{ParkError, ParkResult};
use crate::hub::NotificationHub;
use crate::model::{
    CloseRequest, NewSession, OpenRequest, PageRequest, ParkingSession, SessionClose,
    SessionFilter, SessionPage, SessionStatus, DEFAULT_CLOSE_REASON,
};
use crate::store::SessionStore;

/// Engine tunables
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Billing rate per parked minute
    pub rate_per_minute: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_per_minute: 10.0,
        }
    }
}

/// Enforces the session state machine and derives duration and fee.
///
/// All validation happens before any store write; a failed operation
/// leaves no partial state behind. The entry gate serializes the
/// check-then-write pair of open and close, so concurrent attempts on
/// the same plate resolve deterministically.
pub struct LifecycleEngine {
    store: Arc<dyn SessionStore>,
    hub: NotificationHub,
    config: EngineConfig,
    entry_gate: Mutex<()>,
}

impl LifecycleEngine {
    pub fn new(store: Arc<dyn SessionStore>, hub: NotificationHub, config: EngineConfig) -> Self {
        Self {
            store,
            hub,
            config,
            entry_gate: Mutex::new(()),
        }
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Register a vehicle entering the lot.
    ///
    /// Status and entry stamp are server-assigned regardless of what the
    /// caller sent. A plate with a live `Inside` session cannot enter
    /// again.
    pub async fn open(&self, request: OpenRequest) -> ParkResult<ParkingSession> {
        let plate = request.plate.trim();
        if plate.is_empty() {
            return Err(ParkError::InvalidRequest("plate must not be empty".to_string()));
        }
        let park_lot = request.park_lot.trim();
        if park_lot.is_empty() {
            return Err(ParkError::InvalidRequest(
                "park_lot must not be empty".to_string(),
            ));
        }

        let _gate = self.entry_gate.lock().await;

        if self
            .store
            .find_latest_by_plate_and_status(plate, SessionStatus::Inside)
            .await?
            .is_some()
        {
            return Err(ParkError::DuplicateEntry {
                plate: plate.to_string(),
            });
        }

        let session = self
            .store
            .insert(NewSession {
                plate: plate.to_string(),
                park_lot: park_lot.to_string(),
                start_time: billing::now_stamp(),
                photo_ref: request.photo_ref,
            })
            .await?;

        info!("[{}] session opened for plate '{}'", session.id, session.plate);
        Ok(session)
    }

    /// Close the latest session for a plate.
    ///
    /// The target is picked by recency, not by id. Only the end stamp and
    /// reason come from the caller; park lot, photo reference and entry
    /// stamp are carried over from the stored record. The committed
    /// update is handed to the hub after the store write returns -
    /// delivery can neither delay nor fail the close.
    pub async fn close(
        &self,
        plate: &str,
        request: CloseRequest,
        actor: Option<String>,
    ) -> ParkResult<ParkingSession> {
        let _gate = self.entry_gate.lock().await;

        let current = self
            .store
            .find_latest_by_plate(plate)
            .await?
            .ok_or_else(|| ParkError::NotFound(format!("session for plate '{plate}'")))?;

        if current.status == SessionStatus::Exited {
            return Err(ParkError::AlreadyExited {
                plate: plate.to_string(),
            });
        }

        let assessment = billing::assess(
            &current.start_time,
            &request.end_time,
            self.config.rate_per_minute,
        )?;

        let reason = request
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLOSE_REASON.to_string());

        let updated = self
            .store
            .update(
                current.id,
                &SessionClose {
                    end_time: request.end_time,
                    duration_minutes: assessment.duration_minutes,
                    fee: assessment.fee,
                    closed_by: actor,
                    close_reason: reason,
                },
            )
            .await?;

        info!(
            "[{}] session closed for plate '{}': {} min, fee {}",
            updated.id, updated.plate, assessment.duration_minutes, assessment.fee
        );

        self.hub.publish(updated.clone());
        Ok(updated)
    }

    pub async fn get(&self, id: u64) -> ParkResult<ParkingSession> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ParkError::NotFound(format!("session {id}")))
    }

    /// Filtered, paged read-through to the store, newest first
    pub async fn search(
        &self,
        filter: SessionFilter,
        page: PageRequest,
    ) -> ParkResult<SessionPage> {
        if page.page == 0 || page.limit == 0 {
            return Err(ParkError::InvalidPagination);
        }
        if let Some(date) = &filter.start_date {
            billing::validate_date(date)?;
        }
        if let Some(date) = &filter.end_date {
            billing::validate_date(date)?;
        }

        let (sessions, total_count) = self
            .store
            .query(&filter, page.offset(), page.limit as usize)
            .await?;

        let total_pages = total_count.div_ceil(page.limit);
        Ok(SessionPage {
            sessions,
            page: page.page,
            limit: page.limit,
            total_count,
            total_pages,
            has_next: page.page < total_pages,
            has_prev: page.page > 1,
        })
    }
}
