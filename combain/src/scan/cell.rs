//! Serving cell tower observations.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ValidationError;

/// Largest valid mobile country code (three decimal digits).
pub const MAX_MCC: u16 = 999;

/// Largest valid mobile network code (two or three decimal digits).
pub const MAX_MNC: u16 = 999;

/// Radio access technology of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellTech {
    Gsm,
    Wcdma,
    Lte,
    Cdma,
}

impl CellTech {
    /// Wire name used in the `radioType` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellTech::Gsm => "gsm",
            CellTech::Wcdma => "wcdma",
            CellTech::Lte => "lte",
            CellTech::Cdma => "cdma",
        }
    }
}

impl fmt::Display for CellTech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellTech {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gsm" => Ok(CellTech::Gsm),
            "wcdma" | "umts" => Ok(CellTech::Wcdma),
            "lte" => Ok(CellTech::Lte),
            "cdma" => Ok(CellTech::Cdma),
            _ => Err(ValidationError::UnknownCellTech(s.to_string())),
        }
    }
}

/// The serving cell as reported by the modem.
///
/// For CDMA cells `mnc`, `lac` and `cell_id` carry the system, network and
/// base station identifiers respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTower {
    tech: CellTech,
    mcc: u16,
    mnc: u16,
    lac: u32,
    cell_id: u32,
    signal_strength: i32,
}

impl CellTower {
    /// Validates raw modem fields into a cell tower observation.
    pub fn new(
        tech: CellTech,
        mcc: u16,
        mnc: u16,
        lac: u32,
        cell_id: u32,
        signal_strength: i32,
    ) -> Result<Self, ValidationError> {
        if mcc > MAX_MCC {
            return Err(ValidationError::InvalidMcc(mcc));
        }
        if mnc > MAX_MNC {
            return Err(ValidationError::InvalidMnc(mnc));
        }
        if signal_strength >= 0 {
            return Err(ValidationError::NonNegativeSignal(signal_strength));
        }

        Ok(Self {
            tech,
            mcc,
            mnc,
            lac,
            cell_id,
            signal_strength,
        })
    }

    pub fn tech(&self) -> CellTech {
        self.tech
    }

    pub fn mcc(&self) -> u16 {
        self.mcc
    }

    pub fn mnc(&self) -> u16 {
        self.mnc
    }

    /// Location (or tracking) area code.
    pub fn lac(&self) -> u32 {
        self.lac
    }

    pub fn cell_id(&self) -> u32 {
        self.cell_id
    }

    /// Signal strength in dBm.
    pub fn signal_strength(&self) -> i32 {
        self.signal_strength
    }
}
