//! core
//!
//! Core domain types and configuration for Atomix.
//!
//! # Modules
//!
//! - [`types`] - Primitive kinds
//! - [`naming`] - Primitive and group name resolution
//! - [`timeout`] - Per-call deadlines and unit-suffixed durations
//! - [`config`] - Configuration schema, loading and atomic writes
//!
//! # Design Principles
//!
//! - Closed enums for every fixed set of values
//! - Resolution is a pure function of flags and the loaded config

pub mod config;
pub mod naming;
pub mod timeout;
pub mod types;
