//! Infrastructure layer - backend, session and logging implementations

pub mod auth;
pub mod backend;
pub mod http;
pub mod logging;
pub mod session;
