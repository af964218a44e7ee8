//! # tilde-editor
//!
//! The editing core of tilde.
//!
//! This crate contains the pieces of the editor that don't touch the
//! terminal directly:
//!
//! - **[`row`]**: one line with its tab-expanded render form and highlight
//! - **[`document`]**: the ordered rows of a file, editing, load and save
//! - **[`syntax`]**: filetype profiles and the per-line classifier
//! - **[`cursor`]**: raw-column cursor and its movement rules
//! - **[`viewport`]**: scroll offsets that keep the cursor on screen
//! - **[`search`]**: incremental search session with a match overlay
//! - **[`prompt`]**: the message-bar prompt and its modes
//! - **[`message`]**: the timed status message
//! - **[`render`]**: painting all of the above into a `FrameBuffer`
//! - **[`config`]** / **[`error`]**: settings file and error types

pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod message;
pub mod prompt;
pub mod render;
pub mod row;
pub mod search;
pub mod syntax;
pub mod viewport;

pub use error::{Error, Result};
