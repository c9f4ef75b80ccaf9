pub mod handler;

pub use handler::observer_ws;
