//! # Result Presenter
//!
//! Turns what the service returned into preview handles and a download.
//!
//! - Encode results: the share archive. Both shares get a preview; the
//!   archive is offered as `encrypted_shares.zip`.
//! - Decode results: the reconstructed image, previewed once and offered as
//!   `retrieved_image.png`.
//!
//! A new result supersedes the old one and releases its previews.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::bundle::{self, BundleArchive};
use crate::common::error::{Result, ShareError};
use crate::common::media::Blob;
use crate::preview::{PreviewHandle, PreviewTable};

pub const ENCODE_DOWNLOAD_NAME: &str = "encrypted_shares.zip";
pub const DECODE_DOWNLOAD_NAME: &str = "retrieved_image.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSlot {
    Share1,
    Share2,
    Image,
}

impl ResultSlot {
    const ORDER: [ResultSlot; 3] = [ResultSlot::Share1, ResultSlot::Share2, ResultSlot::Image];
}

/// Payload returned by a successful remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultArtifact {
    Shares(BundleArchive),
    Image(Blob),
}

impl ResultArtifact {
    pub fn bytes(&self) -> &[u8] {
        match self {
            ResultArtifact::Shares(archive) => archive.bytes(),
            ResultArtifact::Image(image) => image.bytes(),
        }
    }

    pub fn suggested_file_name(&self) -> &'static str {
        match self {
            ResultArtifact::Shares(_) => ENCODE_DOWNLOAD_NAME,
            ResultArtifact::Image(_) => DECODE_DOWNLOAD_NAME,
        }
    }
}

/// Holds the current result of a flow and the previews derived from it.
///
/// At most one result is shown at a time. Presenting a new one releases
/// every preview of the old one first.
///
/// # Examples
///
/// ```
/// use securevision_client::client::ResultPresenter;
/// use securevision_client::{Blob, MediaType};
///
/// let mut presenter = ResultPresenter::new();
/// presenter.present_image(Blob::new("r.png", MediaType::Png, vec![1]));
/// assert_eq!(presenter.handles().len(), 1);
/// ```
#[derive(Default)]
pub struct ResultPresenter {
    artifact: Option<ResultArtifact>,
    previews: PreviewTable<ResultSlot>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show an encode result.
    ///
    /// The archive must hold both shares; if it doesn't, the current result
    /// stays as it was.
    pub fn present_shares(&mut self, archive: BundleArchive) -> Result<Vec<PreviewHandle>> {
        let (share1, share2) = bundle::extract_shares(&archive)?;

        self.previews.release_all();
        let handles = vec![
            self.previews.create(ResultSlot::Share1, share1),
            self.previews.create(ResultSlot::Share2, share2),
        ];
        self.artifact = Some(ResultArtifact::Shares(archive));

        Ok(handles)
    }

    /// Show a decode result.
    ///
    /// # Arguments
    ///
    /// * `image` - Reconstructed image as returned by the service
    ///
    /// # Returns
    ///
    /// The handle of the new preview.
    pub fn present_image(&mut self, image: Blob) -> PreviewHandle {
        self.previews.release_all();
        let handle = self.previews.create(ResultSlot::Image, image.clone());
        self.artifact = Some(ResultArtifact::Image(image));
        handle
    }

    pub fn artifact(&self) -> Option<&ResultArtifact> {
        self.artifact.as_ref()
    }

    /// Live handles, shares before image.
    pub fn handles(&self) -> Vec<PreviewHandle> {
        ResultSlot::ORDER
            .iter()
            .filter_map(|slot| self.previews.get(*slot).cloned())
            .collect()
    }

    /// Inline `data:` URIs for every live preview, in the same order as
    /// [`handles`](Self::handles).
    pub fn data_uris(&self) -> Vec<String> {
        self.handles()
            .iter()
            .filter_map(|handle| self.previews.data_uri(handle))
            .collect()
    }

    pub fn previews(&self) -> &PreviewTable<ResultSlot> {
        &self.previews
    }

    /// Write the result under its suggested file name in `dir`.
    ///
    /// # Returns
    ///
    /// The path written, or `NoResult` when nothing has been presented.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let artifact = self.artifact.as_ref().ok_or(ShareError::NoResult)?;

        fs::create_dir_all(dir)?;
        let path = dir.join(artifact.suggested_file_name());
        fs::write(&path, artifact.bytes())?;

        info!("💾 Saved {}", path.display());
        Ok(path)
    }

    /// Write each previewed blob under its own name in `dir`.
    pub fn export_previews(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut paths = Vec::new();
        for handle in self.handles() {
            if let Some(blob) = self.previews.resolve(&handle) {
                let path = dir.join(blob.name());
                fs::write(&path, blob.bytes())?;
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Discard the result and release its previews.
    pub fn reset(&mut self) {
        self.previews.release_all();
        self.artifact = None;
    }
}
