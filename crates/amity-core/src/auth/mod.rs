//! Authentication shared by both Amity services.
//!
//! Provides bearer-token validation, the revocation gate, and the
//! [`Authenticator`] that combines them into a single check.

pub mod authenticator;
pub mod claims;
pub mod jwt;
pub mod revocation;

pub use authenticator::{Authenticator, Principal};
pub use claims::Claims;
pub use jwt::{JwtManager, TokenValidator};
pub use revocation::{InMemoryRevocationGate, RevocationGate};
