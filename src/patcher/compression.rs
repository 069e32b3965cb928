use crate::common::config::CdhTolerance;
use crate::common::errors::PatchError;

use super::cdh::iter_cdh;
use super::eocd::EocdInfo;
use super::{read_u16_le, read_u32_le, warn_on_bad_signature, write_u16_le, write_u32_le, LFH_SIGNATURE};

/// Compression methods a conforming unzip implementation is expected to
/// support: `0` (stored) through `20`, plus the `93..=99` range reserved for
/// newer methods. Anything outside this set is almost certainly a
/// deliberately corrupted header rather than a real compression scheme.
fn is_valid_compression_method(method: u16) -> bool {
    (0..=20).contains(&method) || (93..=99).contains(&method)
}

/// For every central directory entry whose advertised compression method is
/// outside the valid set, rewrites both the central directory header and
/// its corresponding local file header to claim `STORED` (method `0`) with
/// the uncompressed size in place of the compressed size — exactly what a
/// real `STORED` entry would look like, so the repaired image now agrees
/// with itself.
///
/// Grounded in `_patch_invalid_compression_method` in
/// `original_source/quark/core/apkpatcher.py`.
pub(super) fn patch_invalid_compression_method(
    image: &mut [u8],
    info: &EocdInfo,
    tolerance: CdhTolerance,
) -> Result<bool, PatchError> {
    let entries = iter_cdh(image, info);
    let mut patched = false;

    for entry in entries {
        if !entry.is_valid_signature {
            warn_on_bad_signature("central directory header", entry.offset);
            if tolerance == CdhTolerance::Strict {
                return Err(PatchError::InvalidCdhSignature { offset: entry.offset });
            }
            continue;
        }

        let compression_method = read_u16_le(image, entry.offset + 10, "cdh.compression_method")?;
        if is_valid_compression_method(compression_method) {
            continue;
        }

        let lfh_offset = read_u32_le(image, entry.offset + 42, "cdh.lfh_offset")? as usize;
        let uncompressed_size = read_u32_le(image, entry.offset + 24, "cdh.uncompressed_size")?;

        write_u16_le(image, entry.offset + 10, 0, "cdh.compression_method")?;
        write_u32_le(image, entry.offset + 20, uncompressed_size, "cdh.compressed_size")?;

        let lfh_signature_ok = image
            .get(lfh_offset..lfh_offset + LFH_SIGNATURE.len())
            .map(|sig| sig == LFH_SIGNATURE)
            .unwrap_or(false);
        if !lfh_signature_ok {
            warn_on_bad_signature("local file header", lfh_offset);
        }
        write_u16_le(image, lfh_offset + 8, 0, "lfh.compression_method")?;
        write_u32_le(image, lfh_offset + 18, uncompressed_size, "lfh.compressed_size")?;

        patched = true;
    }

    Ok(patched)
}
