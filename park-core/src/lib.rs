pub mod billing;
pub mod error;
pub mod hub;
pub mod lifecycle;
pub mod model;
pub mod store;

pub use error::{ParkError, ParkResult};
pub use hub::{NotificationHub, DEFAULT_QUEUE_CAPACITY};
pub use lifecycle::{EngineConfig, LifecycleEngine};
pub use model::{
    CloseRequest, OpenRequest, PageRequest, ParkingSession, SessionFilter, SessionPage,
    SessionStatus, DEFAULT_CLOSE_REASON,
};
pub use store::{MemoryStore, SessionStore};
