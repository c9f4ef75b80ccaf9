use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ParkError, ParkResult};
use crate::model::{NewSession, ParkingSession, SessionClose, SessionFilter, SessionStatus};

use super::SessionStore;

/// In-memory session store.
///
/// Rows are appended in id order, so recency queries walk the vector in
/// reverse. Stands in for the relational store behind the same trait;
/// also what the test suites run against.
pub struct MemoryStore {
    rows: RwLock<Vec<ParkingSession>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_latest_by_plate_and_status(
        &self,
        plate: &str,
        status: SessionStatus,
    ) -> ParkResult<Option<ParkingSession>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .find(|s| s.plate == plate && s.status == status)
            .cloned())
    }

    async fn find_latest_by_plate(&self, plate: &str) -> ParkResult<Option<ParkingSession>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().rev().find(|s| s.plate == plate).cloned())
    }

    async fn find_by_id(&self, id: u64) -> ParkResult<Option<ParkingSession>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, new: NewSession) -> ParkResult<ParkingSession> {
        let session = ParkingSession {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            plate: new.plate,
            park_lot: new.park_lot,
            start_time: new.start_time,
            end_time: None,
            status: SessionStatus::Inside,
            duration_minutes: None,
            fee: None,
            closed_by: None,
            close_reason: None,
            photo_ref: new.photo_ref,
        };
        self.rows.write().await.push(session.clone());
        Ok(session)
    }

    async fn update(&self, id: u64, close: &SessionClose) -> ParkResult<ParkingSession> {
        let mut rows = self.rows.write().await;
        let session = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ParkError::NotFound(format!("session {id}")))?;
        session.end_time = Some(close.end_time.clone());
        session.status = SessionStatus::Exited;
        session.duration_minutes = Some(close.duration_minutes);
        session.fee = Some(close.fee);
        session.closed_by = close.closed_by.clone();
        session.close_reason = Some(close.close_reason.clone());
        Ok(session.clone())
    }

    async fn query(
        &self,
        filter: &SessionFilter,
        offset: usize,
        limit: usize,
    ) -> ParkResult<(Vec<ParkingSession>, u64)> {
        let rows = self.rows.read().await;
        let matches: Vec<&ParkingSession> =
            rows.iter().rev().filter(|s| filter.matches(s)).collect();
        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, total))
    }
}
