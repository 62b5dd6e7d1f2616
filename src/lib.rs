//! Client library for the Refuge pet-adoption marketplace.
//!
//! This crate is the data layer a marketplace app sits on: session and
//! credential management, an authenticated request gateway with transparent
//! token refresh, a typed API client for the catalog, adoption/foster,
//! boutique, profile, and content endpoints, and a centralized cart service.
//!
//! UI layers depend on [`auth::Session`], [`api::ApiClient`], and
//! [`cart::CartService`]; nothing here renders or navigates. When a call
//! fails with an error where [`api::ApiError::requires_login`] is true, the
//! stored credentials have already been purged and the app should route to
//! its login screen.

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, Gateway, RequestOptions};
pub use auth::{CredentialStore, FileTokenStore, MemoryTokenStore, Session, SessionData};
pub use cart::CartService;
pub use config::Config;
