//! Tabularium - resolution and normalization core for lookup tables
//!
//! Tabularium resolves, reads, and normalizes "lookup" data sets (flat
//! reference tables) that live in one of two storage backends: flat
//! versioned files on disk, or a remote key-value collection reached over
//! REST. Both are presented as a uniform tabular structure.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, path routing, and configuration
//! - [`catalog`] - Boundary to the file-metadata service that maps a
//!   logical lookup identity to its live physical path
//! - [`resolve`] - Path resolution, versioned backup routing, and the
//!   default-template fallback
//! - [`kv`] - Boundary to the remote key-value collection (schema and
//!   row reads)
//! - [`table`] - Projection of heterogeneous records into a rectangular
//!   table
//! - [`replication`] - Best-effort change notification for clustered
//!   deployments
//!
//! # Correctness Invariants
//!
//! 1. Every name entering path construction is reduced to its base-name
//!    component; no parent-directory segment survives
//! 2. Every projected row has exactly as many cells as the field list
//! 3. Permission failures from the collection backend abort projection;
//!    no partial table is ever returned
//! 4. Resolution is stateless and idempotent; nothing is cached between
//!    calls

pub mod catalog;
pub mod core;
pub mod kv;
pub mod replication;
pub mod resolve;
pub mod table;
