mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::ParkResult;
use crate::model::{NewSession, ParkingSession, SessionClose, SessionFilter, SessionStatus};

/// Gateway to the persistent session record set.
///
/// Recency is id-descending: "latest" always means the highest id for
/// the plate. Implementations never interpret the filter beyond the
/// predicates in [`SessionFilter`]; policy lives in the lifecycle engine.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Latest session with the given plate and status, if any
    async fn find_latest_by_plate_and_status(
        &self,
        plate: &str,
        status: SessionStatus,
    ) -> ParkResult<Option<ParkingSession>>;

    /// Latest session with the given plate regardless of status
    async fn find_latest_by_plate(&self, plate: &str) -> ParkResult<Option<ParkingSession>>;

    async fn find_by_id(&self, id: u64) -> ParkResult<Option<ParkingSession>>;

    /// Persist a new `Inside` session and assign its id
    async fn insert(&self, new: NewSession) -> ParkResult<ParkingSession>;

    /// Apply the close changes to the identified record and return the
    /// updated row. Only the fields in [`SessionClose`] ever change.
    async fn update(&self, id: u64, close: &SessionClose) -> ParkResult<ParkingSession>;

    /// Filtered page of sessions, newest first, plus the total match count
    async fn query(
        &self,
        filter: &SessionFilter,
        offset: usize,
        limit: usize,
    ) -> ParkResult<(Vec<ParkingSession>, u64)>;
}
