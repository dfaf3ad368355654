mod error;
mod marker;
pub mod text;

pub use error::ChainError;
pub use marker::{RegistryMarker, RegistryRoot};

use std::fmt;

/// Every data slot lives under this user-defined resource type.
pub const RESOURCE_TYPE: &str = "CUSTOM";

/// en-US. The builder writes and the stub's placeholders are compiled with this id,
/// so an update replaces the placeholder instead of adding a second language.
pub const RESOURCE_LANGUAGE: u16 = 0x0409;

/// CONDITION value baked into the unconfigured stub.
pub const UNCONFIGURED_CONDITION: &str = r"HKLM:SOFTWARE\Microsoft\.NETFramework:$default";

/// CUSTOM resource in the builder image that carries the launcher stub.
pub const STUB_RESOURCE_ID: u16 = 101;

/// Directory under the OS temp dir that receives the extracted payloads.
pub const TEMP_NAMESPACE: &str = "ChainBoot";

pub const VERIFY_YES: &str = "yes";
pub const VERIFY_NO: &str = "no";

/// A fixed resource id inside the stub. Builder and stub (including its build script)
/// both read these values from here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ResourceSlot {
    PrimaryData = 131,
    PrimaryName = 132,
    PrereqData = 133,
    PrereqName = 134,
    Condition = 135,
    Verify = 136,
}

impl ResourceSlot {
    /// Write order used by the builder.
    pub const ALL: [Self; 6] = [
        Self::PrereqData,
        Self::PrereqName,
        Self::PrimaryData,
        Self::PrimaryName,
        Self::Condition,
        Self::Verify,
    ];

    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    pub fn from_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.id() == id)
    }

    pub const fn resource_type(self) -> &'static str {
        RESOURCE_TYPE
    }

    /// String slots hold raw UTF-16LE code units with no terminator.
    pub const fn is_text(self) -> bool {
        !matches!(self, Self::PrereqData | Self::PrimaryData)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::PrimaryData => "PRIMARY_DATA",
            Self::PrimaryName => "PRIMARY_NAME",
            Self::PrereqData => "PREREQ_DATA",
            Self::PrereqName => "PREREQ_NAME",
            Self::Condition => "CONDITION",
            Self::Verify => "VERIFY",
        }
    }
}

impl fmt::Display for ResourceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.id())
    }
}
