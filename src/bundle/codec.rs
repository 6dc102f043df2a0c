//! # Bundle Codec
//!
//! Maps between a [`ShareBundle`] and its zip serialization.
//!
//! ## Validation
//!
//! - Encoding refuses to start unless all three members are supplied, so a
//!   partial archive is never written.
//! - Decoding first parses the central directory and checks the entry name set.
//!   Only when every required name is present are the entries read out.
//!   Extra entries are ignored.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};

use log::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{BundleArchive, Member, ShareBundle, PACKAGE_FILE_NAME};
use crate::common::error::{Result, ShareError};
use crate::common::media::Blob;

/// Serialize three members into a zip archive.
///
/// Each argument is optional so callers can pass slot contents straight
/// through; any `None` fails with [`ShareError::MissingMember`] listing every
/// absent member.
///
/// # Example
/// ```ignore
/// let archive = encode_bundle(Some(&share1), Some(&share2), Some(&recovery))?;
/// std::fs::write("package.zip", archive.bytes())?;
/// ```
pub fn encode_bundle(
    share1: Option<&Blob>,
    share2: Option<&Blob>,
    recovery: Option<&Blob>,
) -> Result<BundleArchive> {
    let members = [
        (Member::Share1, share1),
        (Member::Share2, share2),
        (Member::Recovery, recovery),
    ];

    let missing: Vec<Member> = members
        .iter()
        .filter(|(_, blob)| blob.is_none())
        .map(|(member, _)| *member)
        .collect();
    if !missing.is_empty() {
        return Err(ShareError::MissingMember(missing));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (member, blob) in members {
        if let Some(blob) = blob {
            writer.start_file(member.file_name(), options).map_err(zip_error)?;
            writer.write_all(blob.bytes())?;
        }
    }

    let bytes = writer.finish().map_err(zip_error)?.into_inner();
    debug!("Packed bundle into {} byte archive", bytes.len());

    Ok(BundleArchive::new(PACKAGE_FILE_NAME, bytes))
}

/// Parse an archive and extract all three members.
///
/// # Errors
/// - [`ShareError::InvalidContainer`] if the bytes are not a zip archive
/// - [`ShareError::MissingMember`] naming each required entry that is absent
pub fn decode_bundle(archive: &BundleArchive) -> Result<ShareBundle> {
    let mut zip = open(archive)?;
    require(&zip, &Member::ALL)?;

    Ok(ShareBundle {
        share1: read_member(&mut zip, Member::Share1)?,
        share2: read_member(&mut zip, Member::Share2)?,
        recovery: read_member(&mut zip, Member::Recovery)?,
    })
}

/// Extract only the two share images.
///
/// Encode results are previewed through this: the shares must be there, the
/// recovery entry is carried along in the download but never shown.
pub fn extract_shares(archive: &BundleArchive) -> Result<(Blob, Blob)> {
    let mut zip = open(archive)?;
    require(&zip, &[Member::Share1, Member::Share2])?;

    Ok((
        read_member(&mut zip, Member::Share1)?,
        read_member(&mut zip, Member::Share2)?,
    ))
}

fn open(archive: &BundleArchive) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(archive.bytes())).map_err(zip_error)
}

fn require(zip: &ZipArchive<Cursor<&[u8]>>, members: &[Member]) -> Result<()> {
    let names: HashSet<&str> = zip.file_names().collect();

    let missing: Vec<Member> = members
        .iter()
        .copied()
        .filter(|m| !names.contains(m.file_name()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ShareError::MissingMember(missing))
    }
}

fn read_member(zip: &mut ZipArchive<Cursor<&[u8]>>, member: Member) -> Result<Blob> {
    let mut entry = zip.by_name(member.file_name()).map_err(zip_error)?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| ShareError::InvalidContainer(e.to_string()))?;

    Ok(Blob::new(member.file_name(), member.media_type(), bytes))
}

fn zip_error(e: zip::result::ZipError) -> ShareError {
    ShareError::InvalidContainer(e.to_string())
}
