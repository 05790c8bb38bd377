//! Persistence layer
//!
//! - `sqlite` - append-only time series of collected index quotes

pub mod sqlite;
