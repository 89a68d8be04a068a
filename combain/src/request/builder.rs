//! JSON request body generation.

use serde::Serialize;

use crate::scan::{CellTech, CellTower, ScanItem, WifiAccessPoint};

/// Accumulates validated scan items and renders the positioning request.
///
/// Items keep their insertion order, which makes the generated body
/// deterministic. No deduplication is performed.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    items: Vec<ScanItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestBody {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    wifi_access_points: Vec<WifiAccessPointBody>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cell_towers: Vec<CellTowerBody>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WifiAccessPointBody {
    mac_address: String,
    ssid: String,
    signal_strength: i16,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CellTowerBody {
    radio_type: CellTech,
    mobile_country_code: u16,
    mobile_network_code: u16,
    location_area_code: u32,
    cell_id: u32,
    signal_strength: i32,
}

impl From<&WifiAccessPoint> for WifiAccessPointBody {
    fn from(ap: &WifiAccessPoint) -> Self {
        Self {
            mac_address: ap.bssid().to_string(),
            ssid: ap.ssid_text(),
            signal_strength: ap.signal_strength(),
        }
    }
}

impl From<&CellTower> for CellTowerBody {
    fn from(tower: &CellTower) -> Self {
        Self {
            radio_type: tower.tech(),
            mobile_country_code: tower.mcc(),
            mobile_network_code: tower.mnc(),
            location_area_code: tower.lac(),
            cell_id: tower.cell_id(),
            signal_strength: tower.signal_strength(),
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item to the end of the sequence.
    pub fn append(&mut self, item: impl Into<ScanItem>) {
        self.items.push(item.into());
    }

    /// Number of items appended so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the compact JSON request body.
    ///
    /// Arrays with no items are omitted rather than emitted empty, so an empty
    /// builder produces `{}`.
    pub fn generate_request_body(&self) -> String {
        let mut body = RequestBody {
            wifi_access_points: Vec::new(),
            cell_towers: Vec::new(),
        };

        for item in &self.items {
            match item {
                ScanItem::Wifi(ap) => body.wifi_access_points.push(ap.into()),
                ScanItem::Cell(tower) => body.cell_towers.push(tower.into()),
            }
        }

        // Plain structs of strings and integers always serialize
        serde_json::to_string(&body).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ap(mac: [u8; 6], ssid: &str, signal: i16) -> WifiAccessPoint {
        WifiAccessPoint::new(&mac, ssid.as_bytes(), signal).unwrap()
    }

    #[test]
    fn test_single_access_point_body() {
        let mut builder = RequestBuilder::new();
        builder.append(ap([0x00, 0x11, 0x22, 0x33, 0x44, 0x55], "test", -67));

        assert_eq!(
            builder.generate_request_body(),
            r#"{"wifiAccessPoints":[{"macAddress":"00:11:22:33:44:55","ssid":"test","signalStrength":-67}]}"#
        );
    }

    #[test]
    fn test_empty_builder_omits_keys() {
        let builder = RequestBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.generate_request_body(), "{}");
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut builder = RequestBuilder::new();
        builder.append(ap([0xaa; 6], "second", -40));
        builder.append(ap([0x01; 6], "first", -70));
        builder.append(ap([0xaa; 6], "second", -40));

        let body = builder.generate_request_body();
        assert_eq!(builder.len(), 3);
        let second = body.find("\"second\"").unwrap();
        let first = body.find("\"first\"").unwrap();
        assert!(second < first);
        assert_eq!(body.matches("aa:aa:aa:aa:aa:aa").count(), 2);
    }

    #[test]
    fn test_ssid_json_escaping() {
        let mut builder = RequestBuilder::new();
        builder.append(ap([0x01; 6], "caf\"e\\", -50));

        let body = builder.generate_request_body();
        assert!(body.contains(r#""ssid":"caf\"e\\""#));

        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["wifiAccessPoints"][0]["ssid"], "caf\"e\\");
    }

    #[test]
    fn test_cell_tower_body() {
        let mut builder = RequestBuilder::new();
        builder.append(CellTower::new(CellTech::Lte, 240, 1, 1234, 56789, -80).unwrap());

        assert_eq!(
            builder.generate_request_body(),
            r#"{"cellTowers":[{"radioType":"lte","mobileCountryCode":240,"mobileNetworkCode":1,"locationAreaCode":1234,"cellId":56789,"signalStrength":-80}]}"#
        );
    }

    #[test]
    fn test_mixed_items_grouped_by_kind() {
        let mut builder = RequestBuilder::new();
        builder.append(CellTower::new(CellTech::Gsm, 240, 8, 10, 20, -95).unwrap());
        builder.append(ap([0x00, 0x11, 0x22, 0x33, 0x44, 0x55], "home", -60));

        let parsed: serde_json::Value =
            serde_json::from_str(&builder.generate_request_body()).unwrap();
        assert_eq!(parsed["wifiAccessPoints"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["cellTowers"][0]["radioType"], "gsm");
    }
}
