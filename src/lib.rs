//! Homelab Backend Library
//!
//! Device inventory and live status service for the homelab site.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
/// Device model, validation, and file-backed storage
pub mod devices;
pub mod error;
pub mod router;
/// Shared application state
pub mod state;
pub mod status;

pub use router::build_router;
