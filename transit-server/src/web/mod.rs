//! HTTP surface: routing, suggestions, departure boards and reloads.

pub mod dto;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, DataPaths};
