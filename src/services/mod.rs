//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories:
//! - Implementing the session lifecycle rules
//! - Hashing and verifying passwords
//! - Generating session tokens

pub mod password;
pub mod session;
pub mod token;

pub use password::{hash_password, verify_password};
pub use session::{LoginInput, SessionService, SessionServiceError};
pub use token::generate_session_token;
