use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::constant::*;

/// A 128-byte directory entry ([MS-CFB] 2.6.1). Storage entries root a
/// red-black tree of children; stream entries anchor a sector chain.
///
/// Sibling, child and sector fields are exposed through accessors because
/// the record is packed; name bytes are surfaced as raw UTF-16 code units.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Copy, Clone, Debug)]
#[repr(C, packed)]
pub struct CfbEntry {
    pub name: [u16; 32],
    pub name_len: u16, // in bytes, terminator included
    pub object_type: u8,
    pub color_flag: u8,
    pub left_sibling_id: u32,
    pub right_sibling_id: u32,
    pub child_id: u32,
    pub clsid: [u8; 16],
    pub state_bits: u32,
    pub creation_time: u64,
    pub modified_time: u64,
    pub start_sector_location: u32,
    pub stream_size: u64,
}

impl CfbEntry {
    pub fn is_stream(&self) -> bool {
        self.object_type == CFB_ENTRY_STREAM
    }

    pub fn is_storage(&self) -> bool {
        self.object_type == CFB_ENTRY_STORAGE
    }

    pub fn is_root(&self) -> bool {
        self.object_type == CFB_ENTRY_ROOT_STORAGE
    }

    /// Property set streams announce themselves with a 0x0005 name prefix
    /// ([MS-OLEPS]).
    pub fn is_property_set_stream(&self) -> bool {
        let name = self.name;
        name[0] == CFB_PROPERTY_NAME_MARKER
    }

    /// All 32 name code units, trailing terminator and garbage included.
    #[inline]
    pub fn name_units(&self) -> [u16; 32] {
        self.name
    }

    /// Code units actually part of the name, per the byte length field.
    pub fn name_unit_count(&self) -> usize {
        let bytes = self.name_len as usize;
        (bytes / 2).saturating_sub(1).min(CFB_NAME_UNITS)
    }

    /// Compares the name against a UTF-16 code unit sequence.
    pub fn name_matches(&self, units: &[u16]) -> bool {
        let count = self.name_unit_count();
        let name = self.name;
        count == units.len() && name[..count] == *units
    }

    #[inline]
    pub fn left_sibling(&self) -> Option<u32> {
        match self.left_sibling_id {
            CFB_NO_STREAM => None,
            id => Some(id),
        }
    }

    #[inline]
    pub fn right_sibling(&self) -> Option<u32> {
        match self.right_sibling_id {
            CFB_NO_STREAM => None,
            id => Some(id),
        }
    }

    #[inline]
    pub fn child(&self) -> Option<u32> {
        match self.child_id {
            CFB_NO_STREAM => None,
            id => Some(id),
        }
    }

    #[inline]
    pub fn start_sector(&self) -> u32 {
        self.start_sector_location
    }

    #[inline]
    pub fn stream_size(&self) -> u64 {
        self.stream_size
    }

    #[inline]
    pub fn creation_time(&self) -> u64 {
        self.creation_time
    }

    #[inline]
    pub fn modified_time(&self) -> u64 {
        self.modified_time
    }
}
