//! REST API client module for the Nokori Gohan backend.
//!
//! This module provides the `ApiClient` for all communication with the
//! backend: authentication, user preferences, the ingredient catalog, the
//! per-user inventory, and recipe generation.
//!
//! The API uses bearer token authentication; the token is issued by the
//! auth endpoints and attached to every subsequent request while a session
//! is active.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
