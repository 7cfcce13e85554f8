//! The operator server: session, live channel and HTTP surface.
//!
//! This module handles:
//! - The session object owning match state, observers and collaborators
//! - The frozen WebSocket wire protocol
//! - The axum router and operational endpoints

pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod ws;

pub use handlers::ServerContext;
pub use protocol::{ClientCommand, ServerMessage, Snapshot};
pub use routes::create_router;
pub use session::{ObserverId, Session};
