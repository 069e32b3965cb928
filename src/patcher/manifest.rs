use tracing::info;

use crate::common::config::{CdhTolerance, ManifestRescanPolicy};
use crate::common::errors::PatchError;

use super::cdh::iter_cdh;
use super::eocd::EocdInfo;
use super::{read_u16_le, read_u32_le, warn_on_bad_signature, write_u32_le, LFH_SIGNATURE};

const MANIFEST_FILENAME: &str = "AndroidManifest.xml";
const AXML_MAGIC: u8 = 0x03;
const CRC_CHUNK_SIZE: usize = 65536;

/// Re-stamps a corrupted `AndroidManifest.xml` entry's first content byte
/// back to the AXML magic byte (`0x03`) and recomputes its CRC-32 so the
/// repaired entry is internally consistent.
///
/// Grounded in `_patch_manifest_signature` in
/// `original_source/quark/core/apkpatcher.py`. By default
/// ([`ManifestRescanPolicy::FirstOnly`]) only the first matching entry is
/// examined, whether or not it needed patching — the original always
/// `break`s after its first hit, a behavior `original_source/tests` treat
/// as intentional rather than an oversight.
pub(super) fn patch_manifest_signature(
    image: &mut [u8],
    info: &EocdInfo,
    tolerance: CdhTolerance,
    rescan: ManifestRescanPolicy,
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

        let filename_len = read_u16_le(image, entry.offset + 28, "cdh.filename_len")? as usize;
        let filename_bytes = image
            .get(entry.offset + 46..entry.offset + 46 + filename_len)
            .ok_or(PatchError::UnexpectedEof {
                field: "cdh.filename",
                offset: entry.offset + 46,
            })?;
        let Ok(filename) = std::str::from_utf8(filename_bytes) else {
            continue;
        };
        if filename != MANIFEST_FILENAME {
            continue;
        }

        let compression_method = read_u16_le(image, entry.offset + 10, "cdh.compression_method")?;
        if compression_method != 0 {
            continue;
        }

        let lfh_offset = read_u32_le(image, entry.offset + 42, "cdh.lfh_offset")? as usize;
        let uncompressed_size = read_u32_le(image, entry.offset + 24, "cdh.uncompressed_size")?;
        if uncompressed_size == 0 {
            info!(offset = entry.offset, "manifest entry has zero uncompressed size");
        }

        let lfh_signature_ok = image
            .get(lfh_offset..lfh_offset + LFH_SIGNATURE.len())
            .map(|sig| sig == LFH_SIGNATURE)
            .unwrap_or(false);
        if !lfh_signature_ok {
            warn_on_bad_signature("local file header", lfh_offset);
        }

        let lfh_filename_len = read_u16_le(image, lfh_offset + 26, "lfh.filename_len")? as usize;
        let lfh_extra_field_len = read_u16_le(image, lfh_offset + 28, "lfh.extra_field_len")? as usize;
        let data_offset = lfh_offset + 30 + lfh_filename_len + lfh_extra_field_len;

        let first_byte = *image
            .get(data_offset)
            .ok_or(PatchError::UnexpectedEof {
                field: "manifest.data",
                offset: data_offset,
            })?;

        let entry_patched = if first_byte == AXML_MAGIC {
            false
        } else {
            image[data_offset] = AXML_MAGIC;

            let data_end = data_offset + uncompressed_size as usize;
            let new_crc = rolling_crc32(
                image
                    .get(data_offset..data_end)
                    .ok_or(PatchError::UnexpectedEof {
                        field: "manifest.data",
                        offset: data_offset,
                    })?,
            );

            write_u32_le(image, entry.offset + 16, new_crc, "cdh.crc32")?;
            write_u32_le(image, lfh_offset + 14, new_crc, "lfh.crc32")?;
            true
        };

        patched = patched || entry_patched;

        if rescan == ManifestRescanPolicy::FirstOnly {
            break;
        }
    }

    Ok(patched)
}

/// Recomputes a CRC-32 over `data` in fixed-size chunks rather than as one
/// allocation, matching the streamed `zlib.crc32(chunk, new_crc)` loop in
/// the original — useful when `data` spans a large embedded manifest.
fn rolling_crc32(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for chunk in data.chunks(CRC_CHUNK_SIZE) {
        hasher.update(chunk);
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_crc32_matches_single_shot_for_small_input() {
        let data = b"AndroidManifest payload bytes";
        let mut single = crc32fast::Hasher::new();
        single.update(data);
        assert_eq!(rolling_crc32(data), single.finalize());
    }

    #[test]
    fn rolling_crc32_matches_across_chunk_boundary() {
        let data = vec![0xABu8; CRC_CHUNK_SIZE * 2 + 137];
        let mut single = crc32fast::Hasher::new();
        single.update(&data);
        assert_eq!(rolling_crc32(&data), single.finalize());
    }
}
