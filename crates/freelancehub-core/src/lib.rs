//! Core library for the FreelanceHub marketplace client.
//!
//! - `api`: REST client for the backend
//! - `auth`: session store, credential storage, access gate
//! - `models`: users, profiles, projects, bids
//! - `pages`: view-models for the login, register, project and profile pages
//! - `router`: routes and navigation history
//! - `config`: on-disk configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod pages;
pub mod router;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResult};
pub use auth::{AccessGate, AuthState, Credential, SessionStore, TokenStore};
pub use config::Config;
pub use router::{Navigator, Route};
