//! secure-api - credentials and access plans for secure REST APIs
//!
//! Resolves the API secret for a deployment from a local cache, a remote
//! parameter store, or by generating a new one, and describes how the API
//! should be locked down (API key + usage plan, or IAM identity).

pub mod access;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;

pub use error::{SecureApiError, SecureApiResult};
