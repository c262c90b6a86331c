// State management module
// Shared handles to the device store, status aggregator, and configuration

pub mod app_state;

pub use app_state::AppState;
