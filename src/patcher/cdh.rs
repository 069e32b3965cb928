use super::eocd::EocdInfo;
use super::read_u16_le;

pub const CDH_SIGNATURE: [u8; 4] = *b"PK\x01\x02";

/// One central directory header entry as seen during a tolerant walk of the
/// central directory.
#[derive(Debug, Clone, Copy)]
pub struct CdhEntry {
    pub offset: usize,
    pub is_valid_signature: bool,
}

/// Walks `info.cdh_count` entries starting at `info.cdh_start_offset`,
/// always yielding one [`CdhEntry`] per iteration regardless of whether its
/// signature matches — matching `_iter_cdh` in the original, which is a
/// tolerant generator that lets callers decide what to do about a bad
/// signature rather than aborting the walk itself.
///
/// A record whose signature doesn't match still has its filename/extra/
/// comment length fields read so the walk can advance to the next entry;
/// if those reads run past the end of the image the walk stops early.
pub(super) fn iter_cdh(image: &[u8], info: &EocdInfo) -> Vec<CdhEntry> {
    let mut entries = Vec::with_capacity(info.cdh_count as usize);
    let mut offset = info.cdh_start_offset as usize;

    for _ in 0..info.cdh_count {
        let is_valid_signature = image
            .get(offset..offset + CDH_SIGNATURE.len())
            .map(|sig| sig == CDH_SIGNATURE)
            .unwrap_or(false);

        entries.push(CdhEntry {
            offset,
            is_valid_signature,
        });

        let filename_len = match read_u16_le(image, offset + 28, "cdh.filename_len") {
            Ok(v) => v as usize,
            Err(_) => break,
        };
        let extra_field_len = match read_u16_le(image, offset + 30, "cdh.extra_field_len") {
            Ok(v) => v as usize,
            Err(_) => break,
        };
        let comment_len = match read_u16_le(image, offset + 32, "cdh.comment_len") {
            Ok(v) => v as usize,
            Err(_) => break,
        };

        offset += 46 + filename_len + extra_field_len + comment_len;
    }

    entries
}
