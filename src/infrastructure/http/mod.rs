//! HTTP transport for the roster backend

mod client;
pub mod envelope;

pub use client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use client::mock;
