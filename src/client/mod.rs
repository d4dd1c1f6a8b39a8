//! client
//!
//! Access to the controller and partition group sessions.
//!
//! # Architecture
//!
//! The [`Controller`] and [`Session`] traits define every remote call the
//! CLI makes. Commands never name a concrete client; they go through a
//! [`Connector`] held by the command context, and through
//! [`resolver::Resolver`] for name resolution and scoped sessions.
//!
//! # Modules
//!
//! - `traits`: `Controller`, `Session`, `Connector` and the shared types
//! - [`ops`]: Closed operation and outcome enums for every primitive kind
//! - [`http`]: HTTP/JSON adapter built on `reqwest`
//! - [`mock`]: In-memory implementation for deterministic testing
//! - `factory`: Default connector
//! - [`resolver`]: Group resolution and `with_session`

mod factory;
pub mod http;
pub mod mock;
pub mod ops;
pub mod resolver;
mod traits;

pub use factory::{create_controller, HttpConnector};
pub use resolver::{interruptible, Resolver};
pub use traits::*;
