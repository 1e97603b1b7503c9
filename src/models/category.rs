use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical discharge outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DischargeCategory {
    Successful,
    Revoked,
    Absconded,
    Deceased,
    Active,
    Other,
}

impl DischargeCategory {
    pub const ALL: [DischargeCategory; 6] = [
        DischargeCategory::Successful,
        DischargeCategory::Revoked,
        DischargeCategory::Absconded,
        DischargeCategory::Deceased,
        DischargeCategory::Active,
        DischargeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DischargeCategory::Successful => "successful",
            DischargeCategory::Revoked => "revoked",
            DischargeCategory::Absconded => "absconded",
            DischargeCategory::Deceased => "deceased",
            DischargeCategory::Active => "active",
            DischargeCategory::Other => "other",
        }
    }
}

impl fmt::Display for DischargeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
