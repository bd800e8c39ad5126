//! Externally supplied section names.
//!
//! Game specific metadata ("presets") can give DOL and REL sections their
//! real names. The image builder only ever asks one question of it: does
//! module `m` have a name for slot `s`?

use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Lookup of human-chosen section names, keyed by module id and slot index.
pub trait NamingSource {
    fn section_name(&self, module: u32, slot: usize) -> Option<&str>;
}

impl<T: NamingSource + ?Sized> NamingSource for &T {
    fn section_name(&self, module: u32, slot: usize) -> Option<&str> {
        (**self).section_name(module, slot)
    }
}

/// The absent naming source. Every section gets a generated name.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNames;

impl NamingSource for NoNames {
    fn section_name(&self, _module: u32, _slot: usize) -> Option<&str> {
        None
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct SectionInfo {
    pub slot: usize,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ModuleInfo {
    pub id: u32,
    #[serde(default)]
    pub sections: Vec<SectionInfo>,
}

/// Per-game preset, read from a plist.
///
/// ```xml
/// <dict>
///   <key>description</key><string>Some Game (USA)</string>
///   <key>modules</key>
///   <array>
///     <dict>
///       <key>id</key><integer>0</integer>
///       <key>sections</key>
///       <array>
///         <dict><key>slot</key><integer>0</integer><key>name</key><string>.init</string></dict>
///       </array>
///     </dict>
///   </array>
/// </dict>
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ExtraInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,
}

impl ExtraInfo {
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(plist::from_file(path)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(plist::from_bytes(bytes)?)
    }

    /// A preset without a description is treated as no preset at all.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
    }

    pub fn module(&self, id: u32) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.id == id)
    }
}

impl NamingSource for ExtraInfo {
    fn section_name(&self, module: u32, slot: usize) -> Option<&str> {
        self.module(module)?
            .sections
            .iter()
            .find(|s| s.slot == slot)
            .map(|s| s.name.as_str())
    }
}
