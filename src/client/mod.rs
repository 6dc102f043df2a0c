//! # Client Components
//!
//! ## Transfer Client ([`transfer`])
//! Performs the two remote exchanges, encode and decode, as multipart POSTs.
//!
//! ## Result Presenter ([`presenter`])
//! Turns returned payloads into preview handles and a local download.

pub mod presenter;
pub mod transfer;

// Re-export for convenience
pub use presenter::{ResultArtifact, ResultPresenter, ResultSlot};
pub use transfer::{ApiStatus, TransferClient};
