//! WiFi access point observations.

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Length of an 802.11 BSSID in bytes.
pub const BSSID_LEN: usize = 6;

/// Maximum SSID length in bytes.
pub const MAX_SSID_LEN: usize = 32;

/// A 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; BSSID_LEN]);

impl MacAddress {
    /// Creates an address from raw bytes.
    pub fn new(bytes: [u8; BSSID_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice, which must be exactly six bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let bytes: [u8; BSSID_LEN] = bytes
            .try_into()
            .map_err(|_| ValidationError::InvalidBssidLength(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; BSSID_LEN] {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

impl FromStr for MacAddress {
    type Err = ValidationError;

    /// Parses `xx:xx:xx:xx:xx:xx`, accepting either hex digit case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMacAddress(s.to_string());

        let mut bytes = [0u8; BSSID_LEN];
        let mut groups = s.split(':');
        for byte in bytes.iter_mut() {
            let group = groups.next().ok_or_else(invalid)?;
            if group.len() != 2 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(group, 16).map_err(|_| invalid())?;
        }

        if groups.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(bytes))
    }
}

/// A visible WiFi access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiAccessPoint {
    bssid: MacAddress,
    ssid: Vec<u8>,
    signal_strength: i16,
}

impl WifiAccessPoint {
    /// Validates raw scan fields into an access point.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidBssidLength`] if `bssid` is not six bytes
    /// - [`ValidationError::SsidTooLong`] if `ssid` exceeds 32 bytes
    /// - [`ValidationError::NonNegativeSignal`] if `signal_strength >= 0`
    pub fn new(bssid: &[u8], ssid: &[u8], signal_strength: i16) -> Result<Self, ValidationError> {
        let bssid = MacAddress::from_slice(bssid)?;

        if ssid.len() > MAX_SSID_LEN {
            return Err(ValidationError::SsidTooLong(ssid.len()));
        }

        if signal_strength >= 0 {
            return Err(ValidationError::NonNegativeSignal(i32::from(signal_strength)));
        }

        Ok(Self {
            bssid,
            ssid: ssid.to_vec(),
            signal_strength,
        })
    }

    pub fn bssid(&self) -> MacAddress {
        self.bssid
    }

    /// Raw SSID bytes as reported by the scanner.
    pub fn ssid(&self) -> &[u8] {
        &self.ssid
    }

    /// SSID decoded as text; invalid UTF-8 is replaced with U+FFFD.
    pub fn ssid_text(&self) -> String {
        String::from_utf8_lossy(&self.ssid).into_owned()
    }

    /// Signal strength in dBm.
    pub fn signal_strength(&self) -> i16 {
        self.signal_strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MAC: [u8; 6] = [0x00, 0x11, 0x22, 0x33, 0x44, 0x55];

    #[test]
    fn test_valid_access_point() {
        let ap = WifiAccessPoint::new(&MAC, b"test", -67).unwrap();
        assert_eq!(ap.bssid().as_bytes(), &MAC);
        assert_eq!(ap.ssid(), b"test");
        assert_eq!(ap.signal_strength(), -67);
    }

    #[test]
    fn test_five_byte_bssid_rejected() {
        let result = WifiAccessPoint::new(&MAC[..5], b"test", -67);
        assert_eq!(result, Err(ValidationError::InvalidBssidLength(5)));
    }

    #[test]
    fn test_ssid_length_limit() {
        assert!(WifiAccessPoint::new(&MAC, &[b'a'; 32], -67).is_ok());
        assert_eq!(
            WifiAccessPoint::new(&MAC, &[b'a'; 33], -67),
            Err(ValidationError::SsidTooLong(33))
        );
    }

    #[test]
    fn test_empty_ssid_allowed() {
        // Hidden networks report an empty SSID
        assert!(WifiAccessPoint::new(&MAC, b"", -90).is_ok());
    }

    #[test]
    fn test_signal_strength_must_be_negative() {
        assert_eq!(
            WifiAccessPoint::new(&MAC, b"test", 0),
            Err(ValidationError::NonNegativeSignal(0))
        );
        assert!(WifiAccessPoint::new(&MAC, b"test", 12).is_err());
        assert!(WifiAccessPoint::new(&MAC, b"test", -1).is_ok());
    }

    #[test]
    fn test_ssid_text_lossy() {
        let ap = WifiAccessPoint::new(&MAC, &[b'o', b'k', 0xff], -50).unwrap();
        assert_eq!(ap.ssid_text(), "ok\u{fffd}");
    }

    #[test]
    fn test_mac_display_is_lowercase() {
        let mac = MacAddress::new([0xAB, 0xCD, 0xEF, 0x01, 0x02, 0x0A]);
        assert_eq!(mac.to_string(), "ab:cd:ef:01:02:0a");
    }

    #[test]
    fn test_mac_parse() {
        let mac: MacAddress = "AB:cd:EF:01:02:0a".parse().unwrap();
        assert_eq!(mac.as_bytes(), &[0xAB, 0xCD, 0xEF, 0x01, 0x02, 0x0A]);
    }

    #[test]
    fn test_mac_parse_rejects_malformed() {
        for bad in [
            "",
            "00:11:22:33:44",
            "00:11:22:33:44:55:66",
            "00-11-22-33-44-55",
            "00:11:22:33:44:5",
            "00:11:22:33:44:5g",
            "00:11:22:33:44:555",
            "+0:11:22:33:44:55",
        ] {
            assert!(bad.parse::<MacAddress>().is_err(), "accepted {:?}", bad);
        }
    }

    proptest! {
        #[test]
        fn prop_mac_display_parses_back(bytes in any::<[u8; 6]>()) {
            let mac = MacAddress::new(bytes);
            prop_assert_eq!(mac.to_string().parse::<MacAddress>().unwrap(), mac);
        }

        #[test]
        fn prop_validation_matches_rules(
            bssid_len in 0usize..10,
            ssid_len in 0usize..40,
            signal in any::<i16>(),
        ) {
            let bssid = vec![0u8; bssid_len];
            let ssid = vec![b'x'; ssid_len];
            let valid = bssid_len == 6 && ssid_len <= 32 && signal < 0;
            prop_assert_eq!(WifiAccessPoint::new(&bssid, &ssid, signal).is_ok(), valid);
        }
    }
}
