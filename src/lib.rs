// SPDX-License-Identifier: MIT
#![cfg_attr(not(feature = "std"), no_std)]

//! Reader for Compound File Binary (CFB) container images: the structured
//! storage format wrapping legacy Office documents, HWP files, MSI packages
//! and OLE property streams. The reader borrows a caller-supplied byte image
//! and materializes streams out of its FAT / MiniFAT sector chains without
//! copying anything but the requested stream bytes.

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc;

// === Core modules ===
pub mod constant;
pub mod errors;
pub mod meta;
pub mod sector;
pub mod types;
pub mod utils;

mod reader;
#[cfg(feature = "alloc")]
mod walker;

pub use reader::CfbReader;

// === Prelude re-exports (central entrypoint) ===
pub mod prelude {
    pub use super::CfbReader;
    pub use super::constant::*;
    pub use super::errors::*;
    pub use super::sector::SectorId;
    pub use super::types::{CfbEntry, CfbHeader};
    #[cfg(feature = "alloc")]
    pub use super::utils::decode_name;
}
