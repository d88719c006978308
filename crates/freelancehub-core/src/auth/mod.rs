//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: credential + identity, bootstrap validation, login/register/logout
//! - `TokenStore`: durable storage of the credential (file, OS keychain, memory)
//! - `AccessGate`: route guard redirecting anonymous visitors to login
//!
//! A persisted credential is validated against the backend once per value;
//! validation failure clears it.

pub mod credentials;
pub mod gate;
pub mod session;

pub use credentials::{Credential, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use gate::{Access, AccessGate, Gated, Redirect};
pub use session::{AuthState, SessionStore, Validation, ValidationOutcome};
