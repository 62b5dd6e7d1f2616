//! REST API client module for the Refuge marketplace backend.
//!
//! This module provides:
//! - `Gateway`: the session-authenticated request gateway with
//!   refresh-once-on-401 semantics
//! - `ApiClient`: typed access to every resource the app displays
//! - `ApiError`: the error taxonomy shared by both layers
//!
//! The API uses JWT bearer token authentication; the gateway owns the
//! `Authorization` header and the refresh protocol.

pub mod client;
pub mod error;
pub mod gateway;

pub use client::{ApiClient, Landing};
pub use error::ApiError;
pub use gateway::{Gateway, RequestOptions};
