//! # Upload Collector
//!
//! Sorts picked, dropped or pasted files into [`UploadState`] slots.
//!
//! ## Classification
//!
//! 1. If the first file is declared as a zip, the batch is an archive upload.
//!    The archive is decoded; on success all three slots are filled from it
//!    and the original bytes are kept for the remote call. On failure nothing
//!    changes.
//! 2. Otherwise every file is classified on its own:
//!    - images fill `share1`, then `share2`; further images are dropped
//!    - `.npy` files (or files declared `application/x-npy`) fill `recovery`,
//!      replacing whatever was there
//!    - anything else is dropped
//! 3. Archive and loose uploads never mix. The conflicting batch is rejected
//!    with [`ShareError::ModeConflict`] before any slot is touched.
//!
//! Share slots get a preview handle when filled and lose it when cleared.

use log::{debug, info, warn};

use super::{LooseFiles, UploadMode, UploadState};
use crate::bundle::{self, BundleArchive, Member};
use crate::common::error::{Result, ShareError};
use crate::common::media::Blob;
use crate::preview::{PreviewHandle, PreviewTable};

/// What one call to [`UploadCollector::add_files`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Slots filled (or refilled) by this batch
    pub filled: Vec<Member>,
    /// Names of files that were dropped without error
    pub ignored: Vec<String>,
}

/// Collects the inputs of a decode: one package or three loose files.
///
/// # Examples
///
/// ```
/// use securevision_client::upload::UploadCollector;
/// use securevision_client::{Blob, MediaType, Member};
///
/// let mut collector = UploadCollector::new();
/// let outcome = collector
///     .add_files(vec![
///         Blob::new("a.png", MediaType::Png, vec![1]),
///         Blob::new("notes.txt", MediaType::from_mime("text/plain"), vec![2]),
///     ])
///     .unwrap();
///
/// assert_eq!(outcome.filled, vec![Member::Share1]);
/// assert_eq!(outcome.ignored, vec!["notes.txt".to_string()]);
/// assert!(!collector.is_ready());
/// ```
pub struct UploadCollector {
    state: UploadState,
    previews: PreviewTable<Member>,
}

impl UploadCollector {
    pub fn new() -> Self {
        Self {
            state: UploadState::Empty,
            previews: PreviewTable::new(),
        }
    }

    /// Current slots and mode.
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Preview handle of a share slot. The recovery slot never has one.
    pub fn preview(&self, member: Member) -> Option<&PreviewHandle> {
        self.previews.get(member)
    }

    pub fn previews(&self) -> &PreviewTable<Member> {
        &self.previews
    }

    /// All three members present; the decode action may be enabled.
    pub fn is_ready(&self) -> bool {
        self.state.is_complete()
    }

    /// Add a batch of files. An empty batch is a no-op.
    ///
    /// # Arguments
    ///
    /// * `files` - One drop, pick or paste, in the order it arrived
    ///
    /// # Returns
    ///
    /// The slots filled and the files ignored.
    ///
    /// # Errors
    ///
    /// * `ModeConflict` - the batch would mix a package with loose files
    /// * `InvalidContainer` / `MissingMember` - the package doesn't decode
    pub fn add_files(&mut self, files: Vec<Blob>) -> Result<AddOutcome> {
        let Some(first) = files.first() else {
            return Ok(AddOutcome::default());
        };

        if first.media_type().is_archive() {
            self.add_archive(files)
        } else {
            self.add_loose(files)
        }
    }

    fn add_archive(&mut self, files: Vec<Blob>) -> Result<AddOutcome> {
        if self.state.mode() == Some(UploadMode::Loose) {
            warn!("⚠️  Package upload rejected: individual files already present");
            return Err(ShareError::ModeConflict);
        }

        let mut files = files.into_iter();
        let Some(first) = files.next() else {
            return Ok(AddOutcome::default());
        };
        let ignored: Vec<String> = files.map(|f| f.name().to_string()).collect();

        let archive = BundleArchive::from_blob(first);
        let bundle = match bundle::decode_bundle(&archive) {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("⚠️  Rejected package {}: {}", archive.name(), e);
                return Err(e);
            }
        };

        self.previews.create(Member::Share1, bundle.share1.clone());
        self.previews.create(Member::Share2, bundle.share2.clone());

        info!(
            "📦 Loaded package {} ({} bytes)",
            archive.name(),
            archive.bytes().len()
        );
        self.state = UploadState::Archive { archive, bundle };

        Ok(AddOutcome {
            filled: Member::ALL.to_vec(),
            ignored,
        })
    }

    fn add_loose(&mut self, files: Vec<Blob>) -> Result<AddOutcome> {
        if self.state.mode() == Some(UploadMode::Archive) {
            warn!("⚠️  Individual files rejected: a package is already loaded");
            return Err(ShareError::ModeConflict);
        }

        let mut slots = match std::mem::take(&mut self.state) {
            UploadState::Loose(files) => files,
            _ => LooseFiles::default(),
        };
        let mut outcome = AddOutcome::default();

        for file in files {
            let target = if file.media_type().is_image() {
                [Member::Share1, Member::Share2]
                    .into_iter()
                    .find(|m| slots.get(*m).is_none())
            } else if file.is_recovery_data() {
                Some(Member::Recovery)
            } else {
                None
            };

            match target {
                Some(member) => {
                    debug!("{} -> {}", file.name(), member);
                    if member != Member::Recovery {
                        self.previews.create(member, file.clone());
                    }
                    *slots.slot_mut(member) = Some(file);
                    outcome.filled.push(member);
                }
                None => {
                    warn!("⚠️  Ignoring {} ({})", file.name(), file.media_type());
                    outcome.ignored.push(file.name().to_string());
                }
            }
        }

        self.state = if slots.is_empty() {
            UploadState::Empty
        } else {
            UploadState::Loose(slots)
        };

        Ok(outcome)
    }

    /// Remove one slot.
    ///
    /// In archive mode the package is one unit, so removing any member clears
    /// all of it. In loose mode only that slot is cleared, and the state goes
    /// back to empty when nothing is left.
    pub fn remove(&mut self, member: Member) {
        match std::mem::take(&mut self.state) {
            UploadState::Empty => {}
            UploadState::Archive { archive, .. } => {
                info!("🗑️  Removed package {}", archive.name());
                self.previews.release_all();
            }
            UploadState::Loose(mut slots) => {
                if slots.slot_mut(member).take().is_some() {
                    info!("🗑️  Removed {}", member);
                }
                self.previews.release(member);
                if !slots.is_empty() {
                    self.state = UploadState::Loose(slots);
                }
            }
        }
    }

    /// Drop every file and preview; back to the start of the flow.
    pub fn clear(&mut self) {
        self.previews.release_all();
        self.state = UploadState::Empty;
    }

    /// The archive to send to the decode endpoint.
    ///
    /// An uploaded package is replayed byte for byte; loose files are packed
    /// with [`bundle::encode_bundle`].
    pub fn package(&self) -> Result<BundleArchive> {
        match &self.state {
            UploadState::Empty => Err(ShareError::NothingToSubmit),
            UploadState::Archive { archive, .. } => Ok(archive.clone()),
            UploadState::Loose(slots) => bundle::encode_bundle(
                slots.share1.as_ref(),
                slots.share2.as_ref(),
                slots.recovery.as_ref(),
            ),
        }
    }
}

impl Default for UploadCollector {
    fn default() -> Self {
        Self::new()
    }
}
