//! Atomix CLI - Manage partition groups and distributed primitives
//!
//! `atomix` talks to an Atomix controller to create and inspect partition
//! groups, and operates on the distributed primitives those groups host:
//! locks, sets, maps, counters, lists and leader elections.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing, logging setup and command handlers
//! - [`client`] - Controller and session traits, HTTP adapter and mock
//! - [`primitive`] - Typed handles over each primitive kind
//! - [`core`] - Configuration, name resolution, timeouts and shared types
//! - [`completion`] - Bash completion and the bash-to-zsh transpiler
//! - [`error`] - Command errors and exit statuses
//! - [`ui`] - Output formatting
//!
//! # Guarantees
//!
//! 1. Every remote call runs under its own deadline
//! 2. A session opened by a command is closed before the command exits
//! 3. Failures are reported once, never retried

pub mod cli;
pub mod client;
pub mod completion;
pub mod core;
pub mod error;
pub mod primitive;
pub mod ui;
