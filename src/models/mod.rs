//! Data models
//!
//! Entities persisted by the credential store:
//! - `User`: login identifiers and password hash
//! - `Session`: token bound to a user with a fixed expiry

mod session;
mod user;

pub use session::{Session, SessionStatus};
pub use user::User;
