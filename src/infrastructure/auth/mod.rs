//! Authentication infrastructure module
//!
//! Session management for the signed-in user plus the shared bearer token
//! slot the REST backend reads from.

mod service;
mod token;

pub use service::AuthService;
pub use token::{token_status, TokenCell, TokenStatus};
