pub mod apis;
pub mod auth;
pub mod error;
pub mod http;

pub use auth::Identity;
pub use error::{ApiJson, ErrorResponse};
pub use http::{router, start_server, ServerConfig, ServerState};
