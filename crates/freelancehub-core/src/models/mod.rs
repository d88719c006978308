//! Data models for marketplace entities.
//!
//! This module contains the data structures returned by the backend:
//!
//! - `User`, `PublicProfile`, `Review`: identities and profiles
//! - `Project`, `Bid`, `ProjectStatus`: projects and the bids placed on them

pub mod project;
pub mod user;

pub use project::{Bid, Project, ProjectStatus};
pub use user::{split_skills, PublicProfile, Review, User};
