//! Core types and shared functionality for episearch.
//!
//! This crate provides:
//! - Domain types for episodes, lines, and persisted records
//! - Store traits and the SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod hash;
pub mod record;
pub mod store;

pub use error::Error;
pub use record::{Episode, Line, Record, WireRecord};
pub use store::{BlobStore, FilterExpr, RecordStore, ScanKey, ScanPage, StoreDb};
