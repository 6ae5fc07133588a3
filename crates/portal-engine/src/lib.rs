//! Client-side view-state engine for the suggestion portal.
//!
//! [`Board`] owns the session, the cached suggestion collection, the detail
//! selection and the notification slot. Every operation goes through a
//! [`portal_core::api::PortalApi`] implementation; [`HttpApi`] is the real
//! one.

mod board;
mod feedback;
mod http;
mod profile;

pub mod error;

pub use board::Board;
pub use error::{Error, Result};
pub use feedback::{Notification, Severity};
pub use http::{ApiConfig, HttpApi};
pub use profile::Profile;
