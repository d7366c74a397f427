//! SQLite storage for the relationship service.
//!
//! Accounts and friendship edges. Every edge transition is a single
//! conditional statement, so concurrent requests against the same pair
//! settle on exactly one winner.

mod db;
mod models;
mod queries_friendships;
mod queries_users;

#[cfg(test)]
mod tests;

pub use amity_core::db::DatabaseError;
pub use db::SocialDatabase;
pub use models::*;
