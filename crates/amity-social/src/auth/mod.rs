//! Account signup, credential checks and session handling.

mod accounts;
pub mod password;

pub use accounts::AccountService;
