//! Participating utilities and their code/display-name mapping.

use std::fmt;

/// A utility taking part in the managed charging program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Utility {
    Dte,
    NationalGrid,
    Xcel,
}

impl Utility {
    pub const ALL: [Utility; 3] = [Utility::Dte, Utility::NationalGrid, Utility::Xcel];

    /// Short code used in the enrollment source (`utility_code` column).
    pub fn code(self) -> &'static str {
        match self {
            Utility::Dte => "dte",
            Utility::NationalGrid => "nationalgrid",
            Utility::Xcel => "xcel",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Utility::Dte => "DTE",
            Utility::NationalGrid => "National Grid",
            Utility::Xcel => "Xcel Energy",
        }
    }

    /// Map marker color (RGB).
    pub fn fill_color(self) -> [u8; 3] {
        match self {
            Utility::Dte => [0, 255, 0],
            Utility::NationalGrid => [255, 0, 0],
            Utility::Xcel => [0, 0, 255],
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.code() == code)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.display_name() == name)
    }
}

impl fmt::Display for Utility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Display name for a raw utility code. Unknown codes pass through unchanged.
pub fn display_name_for_code(code: &str) -> String {
    Utility::from_code(code)
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| code.to_string())
}
