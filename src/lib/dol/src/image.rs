use std::ops::Range;

use log::{debug, trace, warn};

use crate::header::RawHeader;
use crate::naming::{NamingSource, NoNames};
use crate::section::Section;
use crate::{MAIN_MODULE, MAX_SECTIONS, Result};

const DEFAULT_TEXT_NAME: &str = ".text";
const DEFAULT_DATA_NAME: &str = ".data";

/// Structural problems the loader tolerates but callers may care about.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Anomaly {
    /// The section claims bytes past the end of the file.
    SectionOutOfBounds { slot: usize, end: u64, file_size: u64 },
}

/// A decoded DOL executable.
///
/// Owns its own copy of the file, so the buffer it was parsed from can be
/// dropped right away.
#[derive(Clone, Debug)]
pub struct Image {
    header: RawHeader,
    sections: Vec<Section>,
    file: Vec<u8>,
}

impl Image {
    /// Decode `data` and name every section with its generated default.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_names(data, &NoNames)
    }

    /// Decode `data`, preferring names from `names` (module 0) over generated
    /// ones.
    pub fn parse_with_names<N: NamingSource + ?Sized>(data: &[u8], names: &N) -> Result<Self> {
        let header = RawHeader::parse(data)?;
        Ok(Self::build(header, data, names))
    }

    /// Interpret an already decoded header. Never fails.
    pub fn build<N: NamingSource + ?Sized>(header: RawHeader, data: &[u8], names: &N) -> Self {
        let mut sections = Vec::with_capacity(MAX_SECTIONS);
        for slot in 0..MAX_SECTIONS {
            if !header.is_live(slot) {
                if let Some((offset, address, length)) = header.slot(slot) {
                    if offset | address | length != 0 {
                        debug!("dropping partially filled slot {}", slot);
                    }
                }
                continue;
            }
            sections.push(Section::new(
                slot,
                header.offsets[slot],
                header.addresses[slot],
                header.lengths[slot],
                RawHeader::is_text_slot(slot),
            ));
        }
        sections.shrink_to_fit();

        for idx in 0..sections.len() {
            let name = section_name(&sections, idx, names);
            trace!("slot {} -> {}", sections[idx].slot, name);
            sections[idx].name = name;
        }

        Self {
            header,
            sections,
            file: data.to_vec(),
        }
    }

    pub fn header(&self) -> &RawHeader {
        &self.header
    }

    /// Live sections in slot order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn file(&self) -> &[u8] {
        &self.file
    }

    pub fn file_size(&self) -> usize {
        self.file.len()
    }

    pub fn entry_point(&self) -> u32 {
        self.header.entry_point
    }

    pub fn bss_range(&self) -> Range<u64> {
        let start = self.header.bss_address as u64;
        start..start + self.header.bss_length as u64
    }

    pub fn code_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_code)
    }

    pub fn data_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_code)
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section whose load range covers `address`.
    pub fn section_at(&self, address: u32) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains_address(address))
    }

    /// File contents of `section`, or `None` if the header points past the
    /// end of the file.
    pub fn section_data(&self, section: &Section) -> Option<&[u8]> {
        let start = usize::try_from(section.offset).ok()?;
        let end = usize::try_from(section.file_end()).ok()?;
        self.file.get(start..end)
    }

    /// Highest file offset any section claims.
    pub fn extent(&self) -> u64 {
        self.sections.iter().map(Section::file_end).max().unwrap_or(0)
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        let file_size = self.file.len() as u64;
        self.sections
            .iter()
            .filter(|s| s.file_end() > file_size)
            .map(|s| {
                warn!(
                    "section {} (slot {}) ends at {:#x}, past end of file ({:#x})",
                    s.name,
                    s.slot,
                    s.file_end(),
                    file_size
                );
                Anomaly::SectionOutOfBounds {
                    slot: s.slot,
                    end: s.file_end(),
                    file_size,
                }
            })
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.extent() <= self.file.len() as u64
    }
}

/// Name for `sections[idx]`: the preset name if there is one, otherwise
/// `.text`/`.data` for the first section of its kind and `.text2`, `.text3`,
/// ... for the ones after it.
fn section_name<N: NamingSource + ?Sized>(sections: &[Section], idx: usize, names: &N) -> String {
    let sec = &sections[idx];
    if let Some(name) = names.section_name(MAIN_MODULE, sec.slot) {
        return name.to_string();
    }

    let rank = sections[..idx]
        .iter()
        .filter(|other| other.is_code == sec.is_code)
        .count();

    let base = if sec.is_code {
        DEFAULT_TEXT_NAME
    } else {
        DEFAULT_DATA_NAME
    };
    if rank == 0 {
        base.to_string()
    } else {
        format!("{}{}", base, rank + 1)
    }
}
