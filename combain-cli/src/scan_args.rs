//! Parsers for `--wifi` and `--cell` values.

use combain::scan::{CellTech, CellTower, MacAddress, WifiAccessPoint};

/// Parse `MAC,SSID,RSSI`.
///
/// The SSID may itself contain commas; the MAC is everything before the
/// first comma and the RSSI everything after the last.
pub fn parse_wifi(value: &str) -> Result<WifiAccessPoint, String> {
    let (mac, rest) = value
        .split_once(',')
        .ok_or_else(|| format!("expected MAC,SSID,RSSI, got '{}'", value))?;
    let (ssid, rssi) = rest
        .rsplit_once(',')
        .ok_or_else(|| format!("expected MAC,SSID,RSSI, got '{}'", value))?;

    let mac: MacAddress = mac.trim().parse().map_err(|e| format!("{}", e))?;
    let rssi: i16 = rssi
        .trim()
        .parse()
        .map_err(|_| format!("invalid RSSI '{}'", rssi.trim()))?;

    WifiAccessPoint::new(mac.as_bytes(), ssid.as_bytes(), rssi).map_err(|e| e.to_string())
}

/// Parse `TECH,MCC,MNC,LAC,CELLID,RSSI`.
pub fn parse_cell(value: &str) -> Result<CellTower, String> {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let [tech, mcc, mnc, lac, cell_id, rssi] = fields.as_slice() else {
        return Err(format!(
            "expected TECH,MCC,MNC,LAC,CELLID,RSSI, got '{}'",
            value
        ));
    };

    let tech: CellTech = tech.parse().map_err(|e| format!("{}", e))?;
    CellTower::new(
        tech,
        number(mcc, "MCC")?,
        number(mnc, "MNC")?,
        number(lac, "LAC")?,
        number(cell_id, "cell ID")?,
        number(rssi, "RSSI")?,
    )
    .map_err(|e| e.to_string())
}

fn number<T: std::str::FromStr>(field: &str, name: &str) -> Result<T, String> {
    field
        .parse()
        .map_err(|_| format!("invalid {} '{}'", name, field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_wifi() {
        let ap = parse_wifi("00:11:22:33:44:55,home,-67").unwrap();
        assert_eq!(ap.bssid().to_string(), "00:11:22:33:44:55");
        assert_eq!(ap.ssid(), b"home");
        assert_eq!(ap.signal_strength(), -67);
    }

    #[test]
    fn test_parse_wifi_ssid_with_commas() {
        let ap = parse_wifi("00:11:22:33:44:55,a,b,c,-40").unwrap();
        assert_eq!(ap.ssid(), b"a,b,c");
    }

    #[test]
    fn test_parse_wifi_empty_ssid() {
        let ap = parse_wifi("00:11:22:33:44:55,,-40").unwrap();
        assert!(ap.ssid().is_empty());
    }

    #[test]
    fn test_parse_wifi_errors() {
        assert!(parse_wifi("00:11:22:33:44:55").is_err());
        assert!(parse_wifi("00:11:22:33:44:55,home").is_err());
        assert!(parse_wifi("zz:11:22:33:44:55,home,-67").is_err());
        assert!(parse_wifi("00:11:22:33:44:55,home,loud").is_err());
        assert!(parse_wifi("00:11:22:33:44:55,home,10").is_err());
    }

    #[test]
    fn test_parse_cell() {
        let tower = parse_cell("lte, 240, 1, 1234, 56789, -80").unwrap();
        assert_eq!(tower.tech(), CellTech::Lte);
        assert_eq!(tower.mcc(), 240);
        assert_eq!(tower.mnc(), 1);
        assert_eq!(tower.lac(), 1234);
        assert_eq!(tower.cell_id(), 56789);
        assert_eq!(tower.signal_strength(), -80);
    }

    #[test]
    fn test_parse_cell_errors() {
        assert!(parse_cell("lte,240,1,1234,56789").is_err());
        assert!(parse_cell("nr,240,1,1234,56789,-80").is_err());
        assert!(parse_cell("lte,2400,1,1234,56789,-80").is_err());
        assert!(parse_cell("lte,240,1,x,56789,-80").is_err());
        assert!(parse_cell("lte,240,1,1234,56789,-80,extra").is_err());
    }

    proptest! {
        #[test]
        fn prop_wifi_fields_survive_parsing(
            mac in proptest::array::uniform6(any::<u8>()),
            ssid in "[a-zA-Z0-9 ,_-]{0,32}",
            rssi in -120i16..0,
        ) {
            let text = format!("{},{},{}", MacAddress::new(mac), ssid, rssi);
            let ap = parse_wifi(&text).unwrap();
            prop_assert_eq!(ap.bssid(), MacAddress::new(mac));
            prop_assert_eq!(ap.ssid(), ssid.as_bytes());
            prop_assert_eq!(ap.signal_strength(), rssi);
        }

        #[test]
        fn prop_cell_rejects_non_negative_rssi(rssi in 0i32..1000) {
            let text = format!("gsm,240,1,1,1,{}", rssi);
            prop_assert!(parse_cell(&text).is_err());
        }
    }
}
