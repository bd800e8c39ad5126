use std::io::{Cursor, Seek, Write};

use binrw::{BinRead, BinReaderExt, BinWrite, BinWriterExt};

use crate::{DolError, MAX_SECTIONS, MAX_TEXT_SECTIONS, Result};

/// Size of the decoded header: the three slot tables plus bss and entry point.
pub const HEADER_SIZE: usize = 0xe4;

/// DOL header as stored on disk.
///
/// Slot `i` is described by `offsets[i]`, `addresses[i]` and `lengths[i]`.
/// Slots `0..7` hold text, slots `7..18` hold data. Nothing here is
/// validated; an unused slot is simply all zeroes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct RawHeader {
    /// file offset of each slot (0x00)
    pub offsets: [u32; MAX_SECTIONS],
    /// load address of each slot (0x48)
    pub addresses: [u32; MAX_SECTIONS],
    /// size in bytes of each slot (0x90)
    pub lengths: [u32; MAX_SECTIONS],
    /// 0xd8
    pub bss_address: u32,
    /// 0xdc
    pub bss_length: u32,
    /// 0xe0
    pub entry_point: u32,
}

impl RawHeader {
    /// Decode the header from the start of `data`.
    ///
    /// Fails only if `data` is shorter than [`HEADER_SIZE`]. Trailing bytes are
    /// ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(DolError::TruncatedInput {
                expected: HEADER_SIZE,
                found: data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[..HEADER_SIZE]);
        Ok(cursor.read_be()?)
    }

    pub fn write_to<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        w.write_be(self)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// `(offset, address, length)` of a slot, or `None` past the last slot.
    pub fn slot(&self, index: usize) -> Option<(u32, u32, u32)> {
        if index >= MAX_SECTIONS {
            return None;
        }
        Some((
            self.offsets[index],
            self.addresses[index],
            self.lengths[index],
        ))
    }

    /// A slot is live when its offset, address and length are all non-zero.
    pub fn is_live(&self, index: usize) -> bool {
        matches!(self.slot(index), Some((o, a, l)) if o != 0 && a != 0 && l != 0)
    }

    pub fn is_text_slot(index: usize) -> bool {
        index < MAX_TEXT_SECTIONS
    }

    pub fn live_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_SECTIONS).filter(|&i| self.is_live(i))
    }
}
