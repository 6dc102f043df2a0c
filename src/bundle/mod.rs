//! # Share Bundle
//!
//! A bundle is the two share images plus the recovery data. On the wire and on
//! disk it travels as one zip archive with three fixed, case-sensitive entry
//! names:
//!
//! ```text
//! share1.png
//! share2.png
//! recovery_data.npy
//! ```
//!
//! The members are opaque: the client never looks inside them. The only rule
//! is that all three must be present, and [`codec`] refuses to build or expose
//! anything less.

pub mod codec;

pub use codec::{decode_bundle, encode_bundle, extract_shares};

use std::fmt;

use crate::common::media::{Blob, MediaType};

/// File name the client gives an archive it builds itself.
pub const PACKAGE_FILE_NAME: &str = "encrypted_package.zip";

/// One of the three required bundle entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Member {
    Share1,
    Share2,
    Recovery,
}

impl Member {
    pub const ALL: [Member; 3] = [Member::Share1, Member::Share2, Member::Recovery];

    /// Entry name inside the archive.
    pub fn file_name(self) -> &'static str {
        match self {
            Member::Share1 => "share1.png",
            Member::Share2 => "share2.png",
            Member::Recovery => "recovery_data.npy",
        }
    }

    /// Media type assigned to the member when it is extracted.
    pub fn media_type(self) -> MediaType {
        match self {
            Member::Share1 | Member::Share2 => MediaType::Png,
            Member::Recovery => MediaType::OctetStream,
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The three members of a complete bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareBundle {
    pub share1: Blob,
    pub share2: Blob,
    pub recovery: Blob,
}

impl ShareBundle {
    pub fn member(&self, member: Member) -> &Blob {
        match member {
            Member::Share1 => &self.share1,
            Member::Share2 => &self.share2,
            Member::Recovery => &self.recovery,
        }
    }
}

/// A serialized bundle: a zip archive declared as `application/zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArchive {
    blob: Blob,
}

impl BundleArchive {
    /// Wrap bytes that are claimed to be an archive. Nothing is validated
    /// until [`decode_bundle`] runs.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            blob: Blob::new(name, MediaType::Zip, bytes),
        }
    }

    pub fn from_blob(blob: Blob) -> Self {
        Self { blob }
    }

    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    pub fn name(&self) -> &str {
        self.blob.name()
    }

    pub fn bytes(&self) -> &[u8] {
        self.blob.bytes()
    }
}
