use crate::common::errors::PatchError;

use super::{read_u16_le, read_u32_le};

pub const EOCD_SIGNATURE: [u8; 4] = *b"PK\x05\x06";

/// The fields of the EOCD record this crate needs: how many central
/// directory entries there are, and where the central directory begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EocdInfo {
    pub eocd_offset: usize,
    pub cdh_count: u16,
    pub cdh_start_offset: u32,
}

/// Finds the last occurrence of the EOCD signature in `image`.
///
/// ZIP readers search from the end because an optional trailing comment can
/// follow the record; this mirrors `raw_data.rfind(EOCD_SIGNATURE)` in the
/// original.
pub(super) fn find_eocd(image: &[u8]) -> Result<usize, PatchError> {
    image
        .windows(EOCD_SIGNATURE.len())
        .rposition(|window| window == EOCD_SIGNATURE)
        .ok_or(PatchError::NoEocd)
}

/// Reads the central-directory entry count (u16 LE at `+10`) and start
/// offset (u32 LE at `+16`) relative to the EOCD record.
pub(super) fn parse_eocd(image: &[u8], eocd_offset: usize) -> Result<EocdInfo, PatchError> {
    let cdh_count = read_u16_le(image, eocd_offset + 10, "eocd.cdh_count")?;
    let cdh_start_offset = read_u32_le(image, eocd_offset + 16, "eocd.cdh_start_offset")?;
    Ok(EocdInfo {
        eocd_offset,
        cdh_count,
        cdh_start_offset,
    })
}
