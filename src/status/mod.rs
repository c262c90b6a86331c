//! Device status resolution
//!
//! Translates monitor ids into online/offline/unknown through a short-lived
//! cache in front of the uptime monitor.

pub mod aggregator;
pub mod cache;
pub mod source;

pub use aggregator::{merge_statuses, monitor_ids, StatusAggregator};
pub use cache::{Clock, ManualClock, StatusCache, SystemClock};
pub use source::{source_from_config, KumaSource, MonitorSource, StatusSourceError, SyntheticSource};
