//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a single entity.

pub mod session;
pub mod user;

pub use session::{SessionRepository, SqlxSessionRepository};
pub use user::{SqlxUserRepository, UserRepository};
