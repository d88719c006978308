//! REST API client module for the FreelanceHub backend.
//!
//! This module provides the `ApiClient` for communicating with the
//! marketplace API: authentication, user profiles, projects and bids.
//!
//! The API uses bearer token authentication. The token is obtained from
//! `POST /auth/login` and carried by the client value that sends a request.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginResponse, RegisterRequest, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{ApiError, ApiResult};
