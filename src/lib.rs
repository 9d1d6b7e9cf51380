//! JUnit report library.
//!
//! This library provides the core functionality of the report action,
//! including report ingestion, check-run summaries and webhook delivery.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
