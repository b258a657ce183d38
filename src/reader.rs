// SPDX-License-Identifier: MIT

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use alloc::{vec, vec::Vec};

use zerocopy::FromBytes;

use crate::constant::*;
use crate::errors::{CfbError, CfbResult};
use crate::meta::CfbMeta;
use crate::sector::SectorId;
use crate::types::{CfbEntry, CfbHeader};
#[cfg(feature = "alloc")]
use crate::walker;

/// Reader over a borrowed container image.
///
/// The reader holds no heap state: the header and every directory entry it
/// hands out are views into the caller's bytes, valid for the image
/// lifetime `'a`. [`read`](CfbReader::read) validates an image and
/// [`clear`](CfbReader::clear) drops the borrow; every other operation
/// fails with `InvalidArgument` until a `read` has succeeded. All read
/// operations take `&self`, so a loaded reader can be shared freely.
pub struct CfbReader<'a> {
    view: Option<CfbView<'a>>,
}

impl<'a> CfbReader<'a> {
    pub fn new() -> Self {
        Self { view: None }
    }

    /// Validates `image` and borrows it. On any failure the reader is left
    /// cleared, so it can be reused with a different image.
    pub fn read(&mut self, image: &'a [u8]) -> CfbResult<()> {
        self.view = None;
        self.view = Some(CfbView::open(image)?);
        Ok(())
    }

    /// Drops the borrow. Idempotent.
    pub fn clear(&mut self) {
        self.view = None;
    }

    pub fn header(&self) -> CfbResult<&'a CfbHeader> {
        Ok(self.view()?.header)
    }

    pub fn root_entry(&self) -> CfbResult<&'a CfbEntry> {
        self.view()?.root_entry()
    }

    /// Resolves a directory entry by index. `CFB_NO_STREAM` resolves to
    /// `None`; an index past the end of the directory chain is an error.
    pub fn entry_at(&self, id: u32) -> CfbResult<Option<&'a CfbEntry>> {
        self.view()?.entry_at(id)
    }

    /// The image-sector number holding FAT block `fat_block`, resolved
    /// through the header DIFAT or the DIFAT sector chain. Returned
    /// verbatim as stored.
    pub fn fat_sector_of(&self, fat_block: u32) -> CfbResult<u32> {
        self.view()?.fat_sector_of(fat_block)
    }

    /// The FAT link following `sector` in its chain, sentinels included.
    pub fn next_sector_in_chain(&self, sector: u32) -> CfbResult<SectorId> {
        let view = self.view()?;
        if sector >= CFB_MAX_REGULAR_SECTOR {
            return Err(CfbError::InvalidArgument("not a regular sector number"));
        }
        view.next_sector(sector)
    }

    /// The MiniFAT link following mini sector `mini` in its chain.
    pub fn next_mini_sector(&self, mini: u32) -> CfbResult<SectorId> {
        let view = self.view()?;
        if mini >= CFB_MAX_REGULAR_SECTOR {
            return Err(CfbError::InvalidArgument("not a regular mini sector number"));
        }
        view.next_mini_sector(mini)
    }

    /// Materializes a stream into an owned buffer of exactly
    /// `entry.stream_size()` bytes. Streams below the header's cutoff live
    /// in the root storage's mini stream; everything else sits directly in
    /// regular sectors.
    #[cfg(feature = "alloc")]
    pub fn read_stream(&self, entry: &CfbEntry) -> CfbResult<Vec<u8>> {
        self.view()?.read_stream(entry)
    }

    /// Visits every entry reachable from the root storage, pre-order:
    /// entry first, then its child subtree one level deeper, then the left
    /// and right sibling subtrees at the same depth.
    #[cfg(feature = "alloc")]
    pub fn iterate_all<F>(&self, callback: F) -> CfbResult<()>
    where
        F: FnMut(&'a CfbEntry, usize),
    {
        let view = self.view()?;
        let root = view.root_entry()?;
        walker::visit_tree(view, root.child(), callback)
    }

    /// Visits every entry below `entry`, in the same order as
    /// [`iterate_all`](CfbReader::iterate_all).
    #[cfg(feature = "alloc")]
    pub fn iterate_from<F>(&self, entry: &CfbEntry, callback: F) -> CfbResult<()>
    where
        F: FnMut(&'a CfbEntry, usize),
    {
        walker::visit_tree(self.view()?, entry.child(), callback)
    }

    /// First reachable entry whose name equals `name` (compared as UTF-16
    /// code units), if any.
    #[cfg(feature = "alloc")]
    pub fn find_entry(&self, name: &str) -> CfbResult<Option<&'a CfbEntry>> {
        let view = self.view()?;
        let root = view.root_entry()?;
        let target: Vec<u16> = name.encode_utf16().collect();
        let mut found = None;
        walker::visit_tree(view, root.child(), |entry, _depth| {
            if found.is_none() && entry.name_matches(&target) {
                found = Some(entry);
            }
        })?;
        Ok(found)
    }

    fn view(&self) -> CfbResult<&CfbView<'a>> {
        self.view
            .as_ref()
            .ok_or(CfbError::InvalidArgument("no image loaded"))
    }
}

impl<'a> Default for CfbReader<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated image: the borrow, the header view and derived geometry.
pub(crate) struct CfbView<'a> {
    image: &'a [u8],
    pub(crate) header: &'a CfbHeader,
    meta: CfbMeta,
}

impl<'a> CfbView<'a> {
    fn open(image: &'a [u8]) -> CfbResult<Self> {
        if image.len() < CFB_HEADER_SIZE {
            return Err(CfbError::InvalidArgument("image shorter than a container header"));
        }
        let (header, _) = CfbHeader::ref_from_prefix(image)
            .map_err(|_| CfbError::InvalidArgument("image shorter than a container header"))?;
        header.validate()?;

        let mut view = Self {
            image,
            header,
            meta: CfbMeta::from_header(header),
        };

        let root = view.root_entry()?;
        if root.creation_time() != 0 {
            return Err(CfbError::HeaderInvalid("root entry creation time must be zero"));
        }
        view.meta.mini_stream_start = root.start_sector();
        Ok(view)
    }

    pub(crate) fn root_entry(&self) -> CfbResult<&'a CfbEntry> {
        self.entry_at(0)?
            .ok_or(CfbError::CorruptDirectory("missing root directory entry"))
    }

    pub(crate) fn entry_at(&self, id: u32) -> CfbResult<Option<&'a CfbEntry>> {
        if id == CFB_NO_STREAM {
            return Ok(None);
        }

        let entries_per_sector = self.meta.dir_entries_per_sector();
        let mut index = id;
        let mut word = SectorId::from_raw(self.meta.first_directory_sector);
        let mut hops = 0usize;
        let max_hops = self.image.len() / self.meta.sector_size + 1;

        while index >= entries_per_sector {
            let sector = word
                .regular()
                .ok_or(CfbError::CorruptChain("directory chain ended before the requested entry"))?;
            word = self.next_sector(sector)?;
            index -= entries_per_sector;
            hops += 1;
            if hops > max_hops {
                return Err(CfbError::CorruptChain("directory chain does not terminate"));
            }
        }

        let sector = word
            .regular()
            .ok_or(CfbError::CorruptChain("directory chain ended before the requested entry"))?;
        let bytes = self.sector_bytes(sector, index as usize * CFB_DIR_ENTRY_SIZE, CFB_DIR_ENTRY_SIZE)?;
        let entry = CfbEntry::ref_from_bytes(bytes).map_err(|_| CfbError::OutOfBounds)?;
        Ok(Some(entry))
    }

    /// Upper bound on directory entry indices this image could back.
    pub(crate) fn max_entry_count(&self) -> usize {
        self.image.len() / CFB_DIR_ENTRY_SIZE
    }

    // --- Sector addressing ---

    /// Bounds-checked view of `len` bytes at `offset` inside regular
    /// sector `sector`.
    fn sector_bytes(&self, sector: u32, offset: usize, len: usize) -> CfbResult<&'a [u8]> {
        if offset >= self.meta.sector_size {
            return Err(CfbError::InvalidArgument("offset past the sector end"));
        }
        if sector >= CFB_MAX_REGULAR_SECTOR {
            return Err(CfbError::InvalidArgument("not a regular sector number"));
        }
        let start = self.meta.sector_offset(sector, offset);
        let end = start.checked_add(len as u64).ok_or(CfbError::OutOfBounds)?;
        if end > self.image.len() as u64 {
            return Err(CfbError::OutOfBounds);
        }
        Ok(&self.image[start as usize..end as usize])
    }

    fn read_u32(&self, sector: u32, offset: usize) -> CfbResult<u32> {
        let bytes = self.sector_bytes(sector, offset, CFB_FAT_ENTRY_SIZE)?;
        let mut word = [0u8; CFB_FAT_ENTRY_SIZE];
        word.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(word))
    }

    // --- FAT / DIFAT walking ---

    pub(crate) fn fat_sector_of(&self, fat_block: u32) -> CfbResult<u32> {
        if (fat_block as usize) < CFB_HEADER_DIFAT_ENTRIES {
            return Ok(self.header.header_difat(fat_block as usize));
        }

        let per_sector = self.meta.difat_entries_per_sector();
        let mut remaining = fat_block - CFB_HEADER_DIFAT_ENTRIES as u32;
        let mut word = SectorId::from_raw(self.meta.first_difat_sector);

        while remaining >= per_sector {
            let sector = word
                .regular()
                .ok_or(CfbError::CorruptChain("DIFAT chain shorter than the FAT block index"))?;
            // The trailing word of a DIFAT sector links to the next one.
            let next = self.read_u32(sector, self.meta.sector_size - CFB_FAT_ENTRY_SIZE)?;
            word = SectorId::from_raw(next);
            remaining -= per_sector;
        }

        let sector = word
            .regular()
            .ok_or(CfbError::CorruptChain("DIFAT chain shorter than the FAT block index"))?;
        self.read_u32(sector, remaining as usize * CFB_FAT_ENTRY_SIZE)
    }

    pub(crate) fn next_sector(&self, sector: u32) -> CfbResult<SectorId> {
        let entries_per_sector = self.meta.fat_entries_per_sector();
        let fat_block = sector / entries_per_sector;
        let slot = sector % entries_per_sector;

        let fat_sector = SectorId::from_raw(self.fat_sector_of(fat_block)?)
            .regular()
            .ok_or(CfbError::CorruptChain("FAT block pointer is not a regular sector"))?;
        let raw = self.read_u32(fat_sector, slot as usize * CFB_FAT_ENTRY_SIZE)?;
        Ok(SectorId::from_raw(raw))
    }

    // --- Mini stream addressing ---

    pub(crate) fn next_mini_sector(&self, mini: u32) -> CfbResult<SectorId> {
        let entries_per_sector = self.meta.fat_entries_per_sector();
        let slot = mini % entries_per_sector;
        let mut hops = mini / entries_per_sector;
        let mut word = SectorId::from_raw(self.meta.first_mini_fat_sector);

        while hops > 0 {
            match word {
                SectorId::Regular(sector) => word = self.next_sector(sector)?,
                SectorId::EndOfChain => return Ok(SectorId::EndOfChain),
                _ => return Err(CfbError::CorruptChain("MiniFAT chain interrupted by a non-regular sector")),
            }
            hops -= 1;
        }

        let sector = match word {
            SectorId::Regular(sector) => sector,
            SectorId::EndOfChain => return Ok(SectorId::EndOfChain),
            _ => return Err(CfbError::CorruptChain("MiniFAT chain interrupted by a non-regular sector")),
        };
        let raw = self.read_u32(sector, slot as usize * CFB_FAT_ENTRY_SIZE)?;
        Ok(SectorId::from_raw(raw))
    }

    /// Bounds-checked view of `len` bytes at `offset` inside mini sector
    /// `mini`, resolved through the root storage's mini stream chain down
    /// to a regular sector.
    fn mini_sector_bytes(&self, mini: u32, offset: usize, len: usize) -> CfbResult<&'a [u8]> {
        if offset >= self.meta.mini_sector_size {
            return Err(CfbError::InvalidArgument("offset past the mini sector end"));
        }
        if mini >= CFB_MAX_REGULAR_SECTOR {
            return Err(CfbError::InvalidArgument("not a regular mini sector number"));
        }

        // Linear position inside the mini stream, then hop down its
        // regular chain one sector at a time.
        let mut linear = mini as u64 * self.meta.mini_sector_size as u64 + offset as u64;
        let mut word = SectorId::from_raw(self.meta.mini_stream_start);
        while linear >= self.meta.sector_size as u64 {
            let sector = word
                .regular()
                .ok_or(CfbError::CorruptChain("mini stream chain shorter than the mini sector index"))?;
            word = self.next_sector(sector)?;
            linear -= self.meta.sector_size as u64;
        }

        let sector = word
            .regular()
            .ok_or(CfbError::CorruptChain("mini stream chain shorter than the mini sector index"))?;
        self.sector_bytes(sector, linear as usize, len)
    }

    // --- Stream materialization ---

    #[cfg(feature = "alloc")]
    pub(crate) fn read_stream(&self, entry: &CfbEntry) -> CfbResult<Vec<u8>> {
        let size = entry.stream_size();
        // Every stream byte is backed by an image sector, so a size past
        // the image length cannot be honest.
        if size > self.image.len() as u64 {
            return Err(CfbError::CorruptChain("stream size exceeds the backing image"));
        }
        let total = size as usize;
        let mini = size < self.meta.mini_stream_cutoff;
        let step = if mini {
            self.meta.mini_sector_size
        } else {
            self.meta.sector_size
        };

        let mut out = vec![0u8; total];
        let mut word = SectorId::from_raw(entry.start_sector());
        let mut pos = 0usize;

        while pos < total {
            let sector = word
                .regular()
                .ok_or(CfbError::CorruptChain("sector chain ended before the stream size"))?;
            let want = step.min(total - pos);
            let src = if mini {
                self.mini_sector_bytes(sector, 0, want)?
            } else {
                self.sector_bytes(sector, 0, want)?
            };
            out[pos..pos + want].copy_from_slice(src);
            pos += want;

            if pos < total {
                word = if mini {
                    self.next_mini_sector(sector)?
                } else {
                    self.next_sector(sector)?
                };
            }
        }

        Ok(out)
    }
}
