//! fakesvc core: error taxonomy and entity models.
//!
//! This crate defines the entities and the error surface shared by the server
//! and any client tooling. It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `FakeSvcError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{ClientCode, FakeSvcError, Result};
pub use model::{NewOrder, NewUser, Order, User};
