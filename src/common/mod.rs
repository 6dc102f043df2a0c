//! # Common Components
//!
//! Shared utilities and data structures used by every stage of the client.
//!
//! ## Modules
//!
//! - [`media`]: Declared media types and the in-memory [`Blob`](media::Blob)
//! - [`error`]: The [`ShareError`](error::ShareError) taxonomy
//! - [`config`]: Configuration parsing utilities
//! - [`logging`]: Logger setup shared by the binaries

pub mod config;
pub mod error;
pub mod logging;
pub mod media;

pub use error::{Result, ShareError};
pub use media::{Blob, MediaType};
