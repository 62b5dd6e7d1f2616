//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `Session`: the shared session context owning the access/refresh pair
//! - `TokenStore`: the persistence seam (file-backed or in-memory)
//! - `CredentialStore`: remember-me password storage via the OS keychain
//!
//! Sessions are persisted to disk and refreshed by the request gateway
//! when the backend rejects an access token.

pub mod credentials;
pub mod session;

pub use credentials::CredentialStore;
pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionData, TokenStore};
