//! Scheduler module for Index Monitor
//!
//! Handles background jobs:
//! - Collection cycle every `collect_interval_secs` (default 60s)
//! - Status report every `status_interval_secs` (default 10s)

mod collection;

pub use collection::{CollectionScheduler, SchedulerHandle};
