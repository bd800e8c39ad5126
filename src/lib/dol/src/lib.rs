//! Reader for DOL executables, the native binary format of the GameCube and Wii.
//!
//! A DOL file starts with a fixed 0xE4 byte header made of three parallel
//! tables (file offsets, load addresses, sizes) covering 7 text and 11 data
//! slots, followed by the bss region and the entry point. [`RawHeader`] is the
//! header exactly as stored; [`Image`] is the interpreted model with unused
//! slots dropped and every live section classified and named.

pub mod header;
pub mod image;
pub mod naming;
pub mod report;
pub mod section;

use thiserror::Error;

pub use crate::header::{HEADER_SIZE, RawHeader};
pub use crate::image::{Anomaly, Image};
pub use crate::naming::{ExtraInfo, ModuleInfo, NamingSource, NoNames, SectionInfo};
pub use crate::report::{HeaderSummary, SectionTable};
pub use crate::section::Section;

/// Number of text (code) slots in the header.
pub const MAX_TEXT_SECTIONS: usize = 7;
/// Number of data slots in the header.
pub const MAX_DATA_SECTIONS: usize = 11;
/// Total number of positional slots in the header.
pub const MAX_SECTIONS: usize = MAX_TEXT_SECTIONS + MAX_DATA_SECTIONS;

/// Module id of the main executable when looking up preset names.
pub const MAIN_MODULE: u32 = 0;

#[derive(Error, Debug)]
pub enum DolError {
    #[error("Truncated DOL header: need {expected} bytes, got {found} ({} missing)", .expected - .found)]
    TruncatedInput { expected: usize, found: usize },
    #[error("Parse error: {0}")]
    Parse(#[from] binrw::Error),
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),
}

pub type Result<T> = std::result::Result<T, DolError>;
