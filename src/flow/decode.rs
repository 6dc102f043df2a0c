//! # Decode Flow
//!
//! A package zip or the three loose files in, the reconstructed image out.

use log::info;

use super::PendingGuard;
use crate::bundle::Member;
use crate::client::{ResultPresenter, TransferClient};
use crate::common::error::Result;
use crate::common::media::Blob;
use crate::upload::{AddOutcome, UploadCollector, UploadState};

/// Decode view state: the upload collector, the result and the pending flag.
///
/// # Examples
///
/// ```
/// use securevision_client::flow::DecodeFlow;
/// use securevision_client::{Blob, MediaType};
///
/// let mut flow = DecodeFlow::new();
/// flow.add_files(vec![Blob::new("share1.png", MediaType::Png, vec![1])]).unwrap();
/// assert!(!flow.action_enabled());
/// ```
#[derive(Default)]
pub struct DecodeFlow {
    collector: UploadCollector,
    presenter: ResultPresenter,
    pending: bool,
}

impl DecodeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one batch of dropped or selected files.
    ///
    /// # Arguments
    ///
    /// * `files` - Every file of the batch, with its declared media type
    ///
    /// # Returns
    ///
    /// Which slots were filled and which files were ignored. Mixing a
    /// package with loose files fails with `ModeConflict`.
    pub fn add_files(&mut self, files: Vec<Blob>) -> Result<AddOutcome> {
        self.collector.add_files(files)
    }

    /// Remove one member. In archive mode this clears the whole package.
    pub fn remove(&mut self, member: Member) {
        self.collector.remove(member);
    }

    pub fn state(&self) -> &UploadState {
        self.collector.state()
    }

    pub fn collector(&self) -> &UploadCollector {
        &self.collector
    }

    /// True when all three members are present and no request is in flight.
    pub fn action_enabled(&self) -> bool {
        self.collector.is_ready() && !self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Package the current upload and decode it remotely.
    ///
    /// Loose files are packed into a fresh archive first; an uploaded package
    /// is sent exactly as it was received.
    pub async fn submit(&mut self, client: &TransferClient) -> Result<()> {
        let archive = self.collector.package()?;

        let outcome = {
            let _pending = PendingGuard::raise(&mut self.pending);
            client.submit_decode(&archive).await
        };

        let image = outcome?;
        self.presenter.present_image(image);
        info!("🔓 Decode complete");
        Ok(())
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    /// Start over: clear every slot, the result and every preview.
    pub fn reset(&mut self) {
        self.pending = false;
        self.collector.clear();
        self.presenter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ShareError;
    use crate::common::media::MediaType;

    #[test]
    fn test_action_enabled_only_when_complete() {
        let mut flow = DecodeFlow::new();
        assert!(!flow.action_enabled());

        flow.add_files(vec![
            Blob::new("share1.png", MediaType::Png, vec![1]),
            Blob::new("share2.png", MediaType::Png, vec![2]),
        ])
        .unwrap();
        assert!(!flow.action_enabled());

        flow.add_files(vec![Blob::new(
            "recovery_data.npy",
            MediaType::OctetStream,
            vec![3],
        )])
        .unwrap();
        assert!(flow.action_enabled());

        flow.reset();
        assert!(!flow.action_enabled());
        assert_eq!(flow.collector().previews().live_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_without_files() {
        let mut flow = DecodeFlow::new();
        let client = TransferClient::new("http://127.0.0.1:9");

        assert!(matches!(
            flow.submit(&client).await,
            Err(ShareError::NothingToSubmit)
        ));
    }
}
