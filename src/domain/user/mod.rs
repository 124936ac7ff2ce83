//! User domain module
//!
//! The user record carries the team reference that the organization store
//! keeps its cached team in line with.

mod entity;
mod validation;

pub use entity::{
    AuthSession, LoginCredentials, RegisterCredentials, User, UserId, UserPatch,
};
pub use validation::{validate_user_id, UserValidationError};
