//! Radio-environment observations contributed to a location request.
//!
//! Scan items are produced by external scanners (WiFi client, modem radio
//! control) and validated here before they can be appended to a request.
//! Construction is fallible: an invalid observation never yields a
//! partially-populated item.
//!
//! # Example
//!
//! ```
//! use combain::scan::{MacAddress, WifiAccessPoint};
//!
//! let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
//! let ap = WifiAccessPoint::new(mac.as_bytes(), b"test", -67).unwrap();
//! assert_eq!(ap.bssid().to_string(), "00:11:22:33:44:55");
//! ```

mod cell;
mod wifi;

use thiserror::Error;

pub use cell::{CellTech, CellTower, MAX_MCC, MAX_MNC};
pub use wifi::{MacAddress, WifiAccessPoint, BSSID_LEN, MAX_SSID_LEN};

/// Errors raised while validating a scan item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// BSSID was not exactly six bytes.
    #[error("BSSID length must be {BSSID_LEN}, got {0}")]
    InvalidBssidLength(usize),

    /// SSID exceeds the 802.11 limit.
    #[error("SSID is too long: {0} bytes (max: {MAX_SSID_LEN})")]
    SsidTooLong(usize),

    /// Signal strength must be a negative dBm value.
    #[error("Signal strength should be negative, got {0}")]
    NonNegativeSignal(i32),

    /// Mobile country code out of range.
    #[error("Mobile country code out of range: {0} (max: {MAX_MCC})")]
    InvalidMcc(u16),

    /// Mobile network code out of range.
    #[error("Mobile network code out of range: {0} (max: {MAX_MNC})")]
    InvalidMnc(u16),

    /// A textual MAC address could not be parsed.
    #[error("Invalid MAC address: '{0}'")]
    InvalidMacAddress(String),

    /// Unknown radio technology name.
    #[error("Unknown cell technology: '{0}'")]
    UnknownCellTech(String),

    /// A request must carry at least one scan item to be submitted.
    #[error("Request contains no scan items")]
    EmptyRequest,
}

/// A validated observation of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanItem {
    /// Visible WiFi access point.
    Wifi(WifiAccessPoint),
    /// Serving cell tower.
    Cell(CellTower),
}

impl From<WifiAccessPoint> for ScanItem {
    fn from(ap: WifiAccessPoint) -> Self {
        ScanItem::Wifi(ap)
    }
}

impl From<CellTower> for ScanItem {
    fn from(tower: CellTower) -> Self {
        ScanItem::Cell(tower)
    }
}
