//! # Encode Flow
//!
//! One image in, a share archive out.

use std::io::Cursor;

use log::{info, warn};

use super::PendingGuard;
use crate::client::{ResultPresenter, TransferClient};
use crate::common::error::{Result, ShareError};
use crate::common::media::Blob;
use crate::preview::{PreviewHandle, PreviewTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceSlot {
    Image,
}

/// Encode view state: the selected image, its preview, the result and the
/// pending flag.
#[derive(Default)]
pub struct EncodeFlow {
    source: Option<Blob>,
    source_preview: PreviewTable<SourceSlot>,
    presenter: ResultPresenter,
    expected_dimensions: Option<[u32; 2]>,
    pending: bool,
}

impl EncodeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Warn when a selected image doesn't have these dimensions.
    pub fn with_expected_dimensions(mut self, dimensions: Option<[u32; 2]>) -> Self {
        self.expected_dimensions = dimensions;
        self
    }

    /// Select the image to encode, replacing any earlier one.
    ///
    /// Only png, jpeg, tiff and heic are accepted. A new image discards the
    /// previous result.
    pub fn select_image(&mut self, image: Blob) -> Result<PreviewHandle> {
        if !image.media_type().is_encodable_image() {
            warn!("⚠️  {} rejected: {}", image.name(), image.media_type());
            return Err(ShareError::UnsupportedMediaType {
                name: image.name().to_string(),
                media_type: image.media_type().to_string(),
            });
        }

        if let Some([width, height]) = self.expected_dimensions {
            match read_dimensions(&image) {
                Some((w, h)) if (w, h) != (width, height) => warn!(
                    "⚠️  {} is {}x{}, the service expects {}x{}",
                    image.name(),
                    w,
                    h,
                    width,
                    height
                ),
                Some(_) => {}
                None => warn!("⚠️  Could not read dimensions of {}", image.name()),
            }
        }

        info!("🖼️  Selected {} ({} bytes)", image.name(), image.len());
        self.presenter.reset();
        let handle = self.source_preview.create(SourceSlot::Image, image.clone());
        self.source = Some(image);
        Ok(handle)
    }

    /// Clear the selection and any result derived from it.
    pub fn remove_image(&mut self) {
        self.source = None;
        self.source_preview.release_all();
        self.presenter.reset();
    }

    pub fn source(&self) -> Option<&Blob> {
        self.source.as_ref()
    }

    pub fn source_preview(&self) -> Option<&PreviewHandle> {
        self.source_preview.get(SourceSlot::Image)
    }

    /// True when an image is selected and no request is in flight.
    pub fn action_enabled(&self) -> bool {
        self.source.is_some() && !self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Encode the selected image and present the returned shares.
    pub async fn submit(&mut self, client: &TransferClient) -> Result<()> {
        let image = self.source.clone().ok_or(ShareError::NothingToSubmit)?;

        let outcome = {
            let _pending = PendingGuard::raise(&mut self.pending);
            client.submit_encode(&image).await
        };

        let archive = outcome?;
        self.presenter.present_shares(archive)?;
        Ok(())
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    /// Start over: drop the image, the result and every preview.
    pub fn reset(&mut self) {
        self.pending = false;
        self.remove_image();
    }
}

fn read_dimensions(image: &Blob) -> Option<(u32, u32)> {
    image::io::Reader::new(Cursor::new(image.bytes()))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
