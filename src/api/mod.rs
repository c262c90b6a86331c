//! API module
//!
//! Contains HTTP request handlers for device, status, and rack endpoints

pub mod devices;
pub mod health;
pub mod rack;
pub mod status;
