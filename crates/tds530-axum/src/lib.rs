#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use chrono as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, serve, start_server};
pub use error::HttpError;
pub use routes::{create_router, create_spa_router};
pub use sse::SseBroadcaster;
pub use state::AppState;
