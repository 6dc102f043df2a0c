//! # SecureVision Client
//!
//! Client side of the SecureVision image secret-sharing service. The sharing
//! itself happens remotely; this crate collects input, packs and unpacks the
//! three-file share bundle, calls the API and presents what comes back.
//!
//! ```text
//! upload (collector) ──> bundle (codec) ──> client (transfer) ──> client (presenter)
//!                                  \___________ flow ___________/
//! ```

pub mod bundle;
pub mod client;
pub mod common;
pub mod flow;
pub mod preview;
pub mod stub;
pub mod upload;

pub use bundle::{BundleArchive, Member, ShareBundle};
pub use common::{Blob, MediaType, Result, ShareError};
pub use flow::{DecodeFlow, EncodeFlow};
