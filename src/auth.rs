//! Identity and credential models produced by the login collaborator.

pub mod secret;
pub mod user;

pub use secret::*;
pub use user::*;
