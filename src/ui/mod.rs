//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Result printing, tables and error messages
//!
//! All command output goes through this module so stdout carries only
//! results and stderr carries only errors and logs.

pub mod output;
