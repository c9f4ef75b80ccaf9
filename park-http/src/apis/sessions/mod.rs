pub mod handler;
pub mod types;

pub use handler::{close_session, create_session, get_session, list_sessions, search_sessions};
pub use types::{
    CloseSessionRequest, CreateSessionRequest, ListQuery, SearchQuery, SessionEnvelope,
    SessionListResponse, SessionView,
};
