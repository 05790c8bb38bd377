//! Services Layer
//!
//! Business logic shared between the scheduler, the REST API handlers and the
//! command-line entry points.
//!
//! # Architecture
//!
//! ```text
//! Scheduler ──┬──> CollectorService ──> QuoteSource
//!             │           └───────────> SqliteDb
//!             └──> StatusService ─────> SqliteDb
//! REST API ──────> QueryService ──────> SqliteDb
//! ```
//!
//! # Services
//!
//! - `CollectorService` - One collection cycle over the tracked indices
//! - `QueryService` - Latest, history and stats reads
//! - `StatusService` - Periodic status report

pub mod collector_service;
pub mod query_service;
pub mod status_service;

pub use collector_service::{CollectionReport, CollectorService, IndexOutcome, OutcomeStatus};
pub use query_service::QueryService;
pub use status_service::{format_price, StatusService};
