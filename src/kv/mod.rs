//! kv
//!
//! Boundary to the remote key-value collection store.
//!
//! # Architecture
//!
//! The `CollectionClient` trait defines the two idempotent reads the
//! core depends on: schema metadata (always under the shared system
//! identity) and raw rows (under the caller's effective owner).
//! [`KvTableReader`] composes a client with the tabular projector to
//! produce rectangular tables.
//!
//! # Modules
//!
//! - `traits`: Core `CollectionClient` trait and error taxonomy
//! - [`rest`]: REST implementation over reqwest
//! - [`mock`]: Mock implementation for deterministic testing
//! - `reader`: Schema-then-rows-then-project read path

pub mod mock;
mod reader;
pub mod rest;
mod traits;

pub use reader::KvTableReader;
pub use traits::{CollectionClient, KvError};
