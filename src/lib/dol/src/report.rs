//! Text reports: the section table, raw slot dump and header lines.

use std::fmt;

use crate::header::RawHeader;
use crate::image::Image;
use crate::section::Section;
use crate::MAX_SECTIONS;

fn table_header(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Sections:")?;
    writeln!(f, "{:>12}{:>12}{:>10}", "Offset", "Address", "Size")
}

fn row(f: &mut fmt::Formatter<'_>, offset: u32, address: u32, length: u32) -> fmt::Result {
    writeln!(f, "{:>#12x}{:>#12x}{:>#12x}", offset, address, length)
}

fn footer(f: &mut fmt::Formatter<'_>, hdr: &RawHeader) -> fmt::Result {
    writeln!(f, "{:>14}{:#x}", ".bss address", hdr.bss_address)?;
    writeln!(f, "{:>14}{:#x}", ".bss length", hdr.bss_length)?;
    writeln!(f, "{:>14}{:#x}", "entry point", hdr.entry_point)
}

/// Raw mode: all 18 slots as stored, unused ones included.
impl fmt::Display for RawHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        table_header(f)?;
        for i in 0..MAX_SECTIONS {
            row(f, self.offsets[i], self.addresses[i], self.lengths[i])?;
        }
        footer(f, self)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        row(f, self.offset, self.address, self.length)
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        table_header(f)?;
        for sec in self.sections() {
            write!(f, "{}", sec)?;
        }
        footer(f, self.header())
    }
}

/// Named section listing, one line per live section.
pub struct SectionTable<'a>(pub(crate) &'a Image);

impl fmt::Display for SectionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:<10}{:>12}{:>12}{:>12}  {}",
            "Slot", "Name", "Offset", "Address", "Size", "Kind"
        )?;
        for sec in self.0.sections() {
            writeln!(
                f,
                "{:>5} {:<10}{:>#12x}{:>#12x}{:>#12x}  {}",
                sec.slot,
                sec.name,
                sec.offset,
                sec.address,
                sec.length,
                sec.kind()
            )?;
        }
        Ok(())
    }
}

/// Header only: the bss and entry point lines.
pub struct HeaderSummary<'a>(pub(crate) &'a RawHeader);

impl fmt::Display for HeaderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        footer(f, self.0)
    }
}

impl Image {
    pub fn section_table(&self) -> SectionTable<'_> {
        SectionTable(self)
    }
}

impl RawHeader {
    pub fn summary(&self) -> HeaderSummary<'_> {
        HeaderSummary(self)
    }
}
