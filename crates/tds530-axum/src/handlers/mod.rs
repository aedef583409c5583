//! HTTP request handlers for the Axum web server.

pub mod events;
pub mod samples;
pub mod status;
