// SPDX-License-Identifier: MIT

// === Header Layout ===

pub const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
pub const CFB_HEADER_SIZE: usize = 512;
pub const CFB_HEADER_DIFAT_ENTRIES: usize = 109; // DIFAT array inside the header

pub const CFB_MINOR_VERSION: u16 = 0x003E; // MinorVersion (always 0x3E)
pub const CFB_MAJOR_VERSION_3: u16 = 0x0003;
pub const CFB_MAJOR_VERSION_4: u16 = 0x0004;
pub const CFB_BYTE_ORDER_MARK: u16 = 0xFFFE; // ByteOrder (little-endian)

pub const CFB_SECTOR_SHIFT_V3: u16 = 9; // 512-byte sectors
pub const CFB_SECTOR_SHIFT_V4: u16 = 12; // 4096-byte sectors
pub const CFB_MINI_SECTOR_SHIFT: u16 = 6; // 64-byte mini sectors

// === Sector Number Sentinels ===

pub const CFB_MAX_REGULAR_SECTOR: u32 = 0xFFFF_FFFA; // MAXREGSECT
pub const CFB_NOT_APPLICABLE: u32 = 0xFFFF_FFFB; // reserved for future use
pub const CFB_DIFAT_SECTOR: u32 = 0xFFFF_FFFC; // DIFSECT
pub const CFB_FAT_SECTOR: u32 = 0xFFFF_FFFD; // FATSECT
pub const CFB_END_OF_CHAIN: u32 = 0xFFFF_FFFE; // ENDOFCHAIN
pub const CFB_FREE_SECTOR: u32 = 0xFFFF_FFFF; // FREESECT

// === FAT Region ===

pub const CFB_FAT_ENTRY_SIZE: usize = 4;

// === Directory Region ===

pub const CFB_DIR_ENTRY_SIZE: usize = 128;
pub const CFB_NO_STREAM: u32 = 0xFFFF_FFFF; // absent sibling / child link
pub const CFB_NAME_UNITS: usize = 32; // UTF-16 code units per entry name

pub const CFB_ENTRY_UNALLOCATED: u8 = 0;
pub const CFB_ENTRY_STORAGE: u8 = 1;
pub const CFB_ENTRY_STREAM: u8 = 2;
pub const CFB_ENTRY_ROOT_STORAGE: u8 = 5;

/// First name code unit of an OLE property set stream ([MS-OLEPS]).
pub const CFB_PROPERTY_NAME_MARKER: u16 = 0x0005;
