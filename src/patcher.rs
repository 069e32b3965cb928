//! In-place APK tamper-repair.
//!
//! Neutralizes two common anti-analysis tricks embedded in a package's ZIP
//! container, operating directly on a mutable, memory-mapped image without
//! changing the file's length: central directory headers that advertise an
//! unsupported compression method (to make naive unzip tools choke), and an
//! `AndroidManifest.xml` entry whose first content byte has been corrupted
//! away from the expected `0x03` AXML magic.
//!
//! Grounded function-for-function in
//! `original_source/quark/core/apkpatcher.py`.

mod cdh;
mod compression;
mod eocd;
mod manifest;


use std::fs::OpenOptions;
use std::path::Path;

use memmap2::MmapMut;
use tracing::warn;

use crate::common::config::{CdhTolerance, ManifestRescanPolicy, PatchConfig};
use crate::common::errors::PatchError;

pub use cdh::CdhEntry;
pub use eocd::EocdInfo;

pub(crate) const LFH_SIGNATURE: [u8; 4] = *b"PK\x03\x04";

pub(crate) fn read_u16_le(image: &[u8], offset: usize, field: &'static str) -> Result<u16, PatchError> {
    let bytes = image
        .get(offset..offset + 2)
        .ok_or(PatchError::UnexpectedEof { field, offset })?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32_le(image: &[u8], offset: usize, field: &'static str) -> Result<u32, PatchError> {
    let bytes = image
        .get(offset..offset + 4)
        .ok_or(PatchError::UnexpectedEof { field, offset })?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn write_u16_le(image: &mut [u8], offset: usize, value: u16, field: &'static str) -> Result<(), PatchError> {
    let bytes = image
        .get_mut(offset..offset + 2)
        .ok_or(PatchError::UnexpectedEof { field, offset })?;
    bytes.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

pub(crate) fn write_u32_le(image: &mut [u8], offset: usize, value: u32, field: &'static str) -> Result<(), PatchError> {
    let bytes = image
        .get_mut(offset..offset + 4)
        .ok_or(PatchError::UnexpectedEof { field, offset })?;
    bytes.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Facade over the tamper-repair sub-routines.
///
/// Every sub-phase (`find_eocd`, `parse_eocd`, the two patch passes) is also
/// independently callable, matching how
/// `original_source/tests/core/test_apkpatcher.py` unit-tests `ApkPatcher`'s
/// staticmethods in isolation rather than only through `patch`.
pub struct ApkPatcher;

impl ApkPatcher {
    /// Repairs `image` in place. Returns whether anything was changed, and
    /// swallows any error into `false` rather than propagating it.
    ///
    /// Matches `ApkPatcher.patch`'s outermost `try/except BaseException as
    /// e: log.exception(e); return False` wrapper — a caller driving a batch
    /// of APKs through this should never have one malformed image abort the
    /// run. Callers that need to distinguish "no patch needed" from "patch
    /// failed" should use [`Self::try_patch`] directly.
    #[must_use]
    pub fn patch(image: &mut [u8], config: &PatchConfig) -> bool {
        match Self::try_patch(image, config) {
            Ok(changed) => changed,
            Err(err) => {
                warn!(%err, "patch failed, leaving image unchanged");
                false
            }
        }
    }

    /// Repairs `image` in place. Returns whether anything was changed.
    ///
    /// Matches `ApkPatcher.patch`'s inner logic: locate the EOCD, parse the
    /// central directory header count/offset, run the compression-method
    /// patch followed by the manifest-signature patch, and report whether
    /// either one touched the image.
    pub fn try_patch(image: &mut [u8], config: &PatchConfig) -> Result<bool, PatchError> {
        let eocd = eocd::find_eocd(image)?;
        let info = eocd::parse_eocd(image, eocd)?;

        let compression_patched =
            compression::patch_invalid_compression_method(image, &info, config.cdh_tolerance)?;
        let manifest_patched =
            manifest::patch_manifest_signature(image, &info, config.cdh_tolerance, config.manifest_rescan)?;

        Ok(compression_patched || manifest_patched)
    }

    /// Locates the End Of Central Directory record, searching from the end
    /// of the image (a ZIP comment may follow it).
    pub fn find_eocd(image: &[u8]) -> Result<usize, PatchError> {
        eocd::find_eocd(image)
    }

    /// Parses the central directory entry count and start offset out of the
    /// EOCD record at `eocd_offset`.
    pub fn parse_eocd(image: &[u8], eocd_offset: usize) -> Result<EocdInfo, PatchError> {
        eocd::parse_eocd(image, eocd_offset)
    }

    /// Walks the central directory, yielding one entry per declared record
    /// regardless of whether its signature checks out (tolerant iteration —
    /// callers decide whether to warn or abort).
    pub fn iter_cdh(image: &[u8], info: &EocdInfo) -> Vec<CdhEntry> {
        cdh::iter_cdh(image, info)
    }

    pub fn patch_invalid_compression_method(
        image: &mut [u8],
        info: &EocdInfo,
        tolerance: CdhTolerance,
    ) -> Result<bool, PatchError> {
        compression::patch_invalid_compression_method(image, info, tolerance)
    }

    pub fn patch_manifest_signature(
        image: &mut [u8],
        info: &EocdInfo,
        tolerance: CdhTolerance,
        rescan: ManifestRescanPolicy,
    ) -> Result<bool, PatchError> {
        manifest::patch_manifest_signature(image, info, tolerance, rescan)
    }

    /// Opens `path` read-write, memory-maps it, and runs [`Self::patch`]
    /// directly over the mapping so the repair never has to hold a second
    /// copy of the (potentially large) APK in heap memory. The mapping is
    /// flushed back to disk on drop.
    pub fn patch_file(path: &Path, config: &PatchConfig) -> Result<bool, PatchError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(PatchError::Io)?;
        let mut mmap = unsafe { MmapMut::map_mut(&file).map_err(PatchError::Io)? };
        Self::try_patch(&mut mmap, config)
    }
}

pub(crate) fn warn_on_bad_signature(what: &str, offset: usize) {
    warn!(offset, "{what} has an unexpected signature; continuing tolerantly");
}
