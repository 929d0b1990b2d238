//! fakesvc server library entry.
//!
//! This crate wires the metric registry, simulators, cache shim and entity
//! store into an axum service. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod cache;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod sim;
pub mod store;
