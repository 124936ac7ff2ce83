//! Roster backend implementations

mod rest;

pub use rest::RestRosterBackend;
