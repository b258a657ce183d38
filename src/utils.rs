#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::string::String;

#[cfg(feature = "alloc")]
use core::char::{decode_utf16, REPLACEMENT_CHARACTER};

#[cfg(feature = "alloc")]
use crate::types::CfbEntry;

/// Decodes raw UTF-16 code units, substituting the replacement character
/// for unpaired surrogates.
#[cfg(feature = "alloc")]
pub fn decode_units(units: &[u16]) -> String {
    decode_utf16(units.iter().copied())
        .map(|r| r.unwrap_or(REPLACEMENT_CHARACTER))
        .collect()
}

/// Decodes a directory entry name. The engine itself only surfaces the raw
/// code units; conversion is a convenience on top.
#[cfg(feature = "alloc")]
pub fn decode_name(entry: &CfbEntry) -> String {
    let units = entry.name_units();
    decode_units(&units[..entry.name_unit_count()])
}
