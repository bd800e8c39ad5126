use std::ops::Range;

/// A live, file-backed DOL section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    /// header slot this section was read from
    pub slot: usize,
    pub offset: u32,
    pub address: u32,
    pub length: u32,
    /// text (code) section if set, data section otherwise
    pub is_code: bool,
    pub name: String,
}

impl Section {
    pub fn new(slot: usize, offset: u32, address: u32, length: u32, is_code: bool) -> Self {
        Self {
            slot,
            offset,
            address,
            length,
            is_code,
            name: String::new(),
        }
    }

    /// End of the section in the file. Computed in 64 bits so a bogus header
    /// cannot wrap around.
    pub fn file_end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }

    pub fn file_range(&self) -> Range<u64> {
        self.offset as u64..self.file_end()
    }

    pub fn address_range(&self) -> Range<u64> {
        self.address as u64..self.address as u64 + self.length as u64
    }

    pub fn contains_address(&self, address: u32) -> bool {
        self.address_range().contains(&(address as u64))
    }

    pub fn kind(&self) -> &'static str {
        if self.is_code { "text" } else { "data" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_do_not_wrap() {
        let sec = Section::new(0, 0xffff_fff0, 0xffff_fff0, 0x20, true);
        assert_eq!(sec.file_end(), 0x1_0000_0010);
        assert!(sec.contains_address(0xffff_ffff));
        assert!(!sec.contains_address(0x10));
    }

    #[test]
    fn test_contains_address_bounds() {
        let sec = Section::new(7, 0x2000, 0x8000_4000, 0x100, false);
        assert!(sec.contains_address(0x8000_4000));
        assert!(sec.contains_address(0x8000_40ff));
        assert!(!sec.contains_address(0x8000_4100));
        assert!(!sec.contains_address(0x8000_3fff));
        assert_eq!(sec.kind(), "data");
    }
}
