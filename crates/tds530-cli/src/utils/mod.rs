//! Small helpers shared by handlers.

pub mod browser;
