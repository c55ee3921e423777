//! Web layer for the subway network service.
//!
//! Provides HTTP endpoints for managing stations, lines and sections,
//! and for querying shortest routes across the network.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
