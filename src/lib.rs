//! Catalog search, fit scoring, and application progress tracking for
//! university and scholarship applications.

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod storage;
pub mod telemetry;
pub mod tracker;
