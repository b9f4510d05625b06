//! Client for the external content REST API.
//!
//! Persistence, authentication and file storage all live behind this API.
//! Every call goes through [`ApiClient`], which carries the admin session guard.

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;
