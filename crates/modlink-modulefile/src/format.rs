//! Wire constants for the module-file container (`spec.md` §4.5).

/// Magic number at the start of every module-file.
pub const MAGIC: u32 = 0x4D4F_4446; // "MODF"

/// The only defined file type.
pub const FILE_TYPE: u16 = 1;

pub const MAJOR: u16 = 1;
pub const MINOR: u16 = 0;

/// SHA-256 is the only defined hash-type value.
pub const HASH_TYPE_SHA256: u16 = 1;

pub const SUBSECTION_TYPE_FILE: u16 = 1;

/// A section's content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SectionType {
    ModuleInfo = 1,
    Signature = 2,
    Classes = 3,
    Resources = 4,
    NativeLibs = 5,
    NativeCmds = 6,
    Config = 7,
}

impl SectionType {
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub fn from_u16(v: u16) -> Option<Self> {
        Some(match v {
            1 => Self::ModuleInfo,
            2 => Self::Signature,
            3 => Self::Classes,
            4 => Self::Resources,
            5 => Self::NativeLibs,
            6 => Self::NativeCmds,
            7 => Self::Config,
            _ => return None,
        })
    }

    /// True iff this section type carries one or more [`SUBSECTION_TYPE_FILE`]
    /// subsections rather than a single undivided content blob.
    #[must_use]
    pub fn is_file_bearing(self) -> bool {
        !matches!(self, Self::ModuleInfo | Self::Signature)
    }

    /// The extraction subdirectory for this section type (`spec.md` §6
    /// "Subdir mapping").
    #[must_use]
    pub fn subdir(self) -> &'static str {
        match self {
            Self::ModuleInfo | Self::Signature => ".",
            Self::Classes | Self::Resources => "classes",
            Self::NativeLibs => "lib",
            Self::NativeCmds => "bin",
            Self::Config => "etc",
        }
    }

    /// The compressor §4.5 mandates for this section type, where fixed.
    #[must_use]
    pub fn mandated_compressor(self) -> Option<Compressor> {
        match self {
            Self::ModuleInfo => Some(Compressor::None),
            Self::Classes => Some(Compressor::Pack200Gzip),
            _ => None,
        }
    }
}

/// A section's content compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Compressor {
    None = 0,
    Gzip = 1,
    Pack200Gzip = 2,
}

impl Compressor {
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub fn from_u16(v: u16) -> Option<Self> {
        Some(match v {
            0 => Self::None,
            1 => Self::Gzip,
            2 => Self::Pack200Gzip,
            _ => return None,
        })
    }
}
