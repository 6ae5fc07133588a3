//! Core types for the suggestion portal client.
//!
//! This crate is deliberately free of HTTP and runtime dependencies. It holds
//! the wire types, the status workflow, the view filter pipeline, and the
//! [`api::PortalApi`] trait that backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod api;
pub mod error;
pub mod filter;
pub mod session;
pub mod suggestion;
pub mod workflow;

pub use error::{ApiError, Error, Result};
