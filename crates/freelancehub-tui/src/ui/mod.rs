//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, nav bar, status bar and overlays
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling
//! - `screens`: per-route content (forms, project, profile)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
