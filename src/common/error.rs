//! # Error Taxonomy
//!
//! Every failure is local to the flow that produced it. Nothing here is fatal:
//! the user clears their files and starts over, and nothing is retried.

use thiserror::Error;

use crate::bundle::Member;

pub type Result<T> = std::result::Result<T, ShareError>;

#[derive(Debug, Error)]
pub enum ShareError {
    /// A required bundle entry is absent.
    #[error("missing bundle member(s): {}", join_members(.0))]
    MissingMember(Vec<Member>),

    /// Bytes could not be parsed as a zip container.
    #[error("invalid container: {0}")]
    InvalidContainer(String),

    /// Archive-mode and loose-mode uploads were mixed.
    #[error("cannot mix a package upload with individual files")]
    ModeConflict,

    /// The remote answered with a non-success status.
    #[error("{endpoint} rejected the request with status {status}")]
    RemoteRejected { endpoint: String, status: u16 },

    #[error("{name}: unsupported media type {media_type}")]
    UnsupportedMediaType { name: String, media_type: String },

    #[error("nothing to submit")]
    NothingToSubmit,

    #[error("no result to save")]
    NoResult,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShareError {
    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ShareError::MissingMember(members) => {
                format!("Missing required files: {}", join_members(members))
            }
            ShareError::InvalidContainer(_) => "Error processing file".to_string(),
            ShareError::ModeConflict => "Please remove existing files first".to_string(),
            ShareError::RemoteRejected { .. } | ShareError::Transport(_) => {
                "Request failed, please try again".to_string()
            }
            ShareError::UnsupportedMediaType { name, .. } => {
                format!("{} is not a supported image (png, jpeg, tiff, heic)", name)
            }
            ShareError::NothingToSubmit => "Please upload the required files first".to_string(),
            ShareError::NoResult => "Nothing to download yet".to_string(),
            ShareError::Io(e) => format!("File error: {}", e),
        }
    }
}

fn join_members(members: &[Member]) -> String {
    members
        .iter()
        .map(|m| m.file_name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_member_message_names_entries() {
        let err = ShareError::MissingMember(vec![Member::Share2, Member::Recovery]);

        assert_eq!(
            err.user_message(),
            "Missing required files: share2.png, recovery_data.npy"
        );
        assert!(err.to_string().contains("share2.png"));
    }
}
