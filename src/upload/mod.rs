//! # Upload State
//!
//! Decode input arrives in one of two shapes, and the state keeps them apart:
//!
//! - **Archive**: the user supplied a package zip. The original bytes are
//!   kept verbatim for the remote call, next to the decoded members.
//! - **Loose**: the user supplied the shares and recovery data one by one.
//!
//! The modes are variants of one enum, so archive bytes next to loose slots
//! cannot be represented.

pub mod collector;

pub use collector::{AddOutcome, UploadCollector};

use crate::bundle::{BundleArchive, Member, ShareBundle};
use crate::common::media::Blob;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Archive,
    Loose,
}

/// Individually uploaded members. At least one slot is filled whenever this
/// sits inside [`UploadState::Loose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LooseFiles {
    pub share1: Option<Blob>,
    pub share2: Option<Blob>,
    pub recovery: Option<Blob>,
}

impl LooseFiles {
    pub fn get(&self, member: Member) -> Option<&Blob> {
        match member {
            Member::Share1 => self.share1.as_ref(),
            Member::Share2 => self.share2.as_ref(),
            Member::Recovery => self.recovery.as_ref(),
        }
    }

    fn slot_mut(&mut self, member: Member) -> &mut Option<Blob> {
        match member {
            Member::Share1 => &mut self.share1,
            Member::Share2 => &mut self.share2,
            Member::Recovery => &mut self.recovery,
        }
    }

    pub fn is_empty(&self) -> bool {
        Member::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Empty,
    Archive {
        archive: BundleArchive,
        bundle: ShareBundle,
    },
    Loose(LooseFiles),
}

impl UploadState {
    pub fn mode(&self) -> Option<UploadMode> {
        match self {
            UploadState::Empty => None,
            UploadState::Archive { .. } => Some(UploadMode::Archive),
            UploadState::Loose(_) => Some(UploadMode::Loose),
        }
    }

    pub fn slot(&self, member: Member) -> Option<&Blob> {
        match self {
            UploadState::Empty => None,
            UploadState::Archive { bundle, .. } => Some(bundle.member(member)),
            UploadState::Loose(files) => files.get(member),
        }
    }

    /// Members currently present, in slot order.
    pub fn filled(&self) -> Vec<Member> {
        Member::ALL
            .into_iter()
            .filter(|m| self.slot(*m).is_some())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.filled().len() == Member::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, UploadState::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::media::MediaType;

    #[test]
    fn test_loose_slots_report_filled_members() {
        let state = UploadState::Loose(LooseFiles {
            share2: Some(Blob::new("b.png", MediaType::Png, vec![2])),
            ..Default::default()
        });

        assert_eq!(state.mode(), Some(UploadMode::Loose));
        assert_eq!(state.filled(), vec![Member::Share2]);
        assert!(!state.is_complete());
        assert!(UploadState::default().is_empty());
    }
}
