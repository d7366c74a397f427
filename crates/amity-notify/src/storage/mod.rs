//! SQLite storage for delivered notifications.

mod db;
mod models;
mod queries;


pub use amity_core::db::DatabaseError;
pub use db::NotificationDatabase;
pub use models::*;
