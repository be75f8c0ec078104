//! core
//!
//! Core domain types, path routing, and configuration for Tabularium.
//!
//! # Modules
//!
//! - [`types`] - Strong types: LookupName, Namespace, Owner, LookupId, etc.
//! - [`paths`] - Centralized path routing for lookup storage
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing sanitizes names at construction time; path joins only
//!   ever see base-name components
//! - All path computation is deterministic and routed through one module

pub mod config;
pub mod paths;
pub mod types;
