//! Amity relationship service.
//!
//! Accounts, the friendship state machine and the `/user/*` HTTP router.

pub mod auth;
pub mod friendship;
pub mod server;
pub mod storage;

pub use auth::AccountService;
pub use friendship::FriendshipService;
pub use server::{SocialState, build_router};
pub use storage::SocialDatabase;
