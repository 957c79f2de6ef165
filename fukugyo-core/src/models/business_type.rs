use serde::{Deserialize, Serialize};

/// How the side business is currently run.
///
/// Some deductions (the small-business mutual aid scheme in particular) are
/// only open to sole proprietors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    /// Registered sole proprietor filing a blue return.
    #[serde(rename = "individual")]
    SoleProprietor,
    Corporation,
    /// Side income without a registered business.
    #[default]
    #[serde(rename = "none")]
    Unregistered,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SoleProprietor => "individual",
            Self::Corporation => "corporation",
            Self::Unregistered => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" | "sole" | "sole-proprietor" => Some(Self::SoleProprietor),
            "corporation" | "corp" => Some(Self::Corporation),
            "none" | "" => Some(Self::Unregistered),
            _ => None,
        }
    }
}
