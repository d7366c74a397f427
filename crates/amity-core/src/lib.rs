//! Amity Core Library
//!
//! Shared functionality for the Amity services:
//! - Access-token validation and the revocation gate
//! - Friendship event wire format, in-process broker and publisher
//! - Common error taxonomy and its HTTP mapping
//! - `SQLite` helpers and tracing initialisation

pub mod auth;
pub mod bus;
pub mod db;
pub mod error;
pub mod http;
pub mod tracing_init;

pub use auth::{Authenticator, Principal};
pub use error::{Error, Result};
