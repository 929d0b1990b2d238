//! Top-level facade crate for fakesvc.
//!
//! Re-exports the core types and the server library so users can depend on a single crate.

pub mod core {
    pub use fakesvc_core::*;
}

pub mod server {
    pub use fakesvc_server::*;
}
