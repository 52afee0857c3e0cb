/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::{ Deserialize, Serialize };

/// Every Wink response wraps its payload in `data`.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Device {
    pub object_type: String,
    pub object_id: String,
    #[serde(default)]
    pub name: String,
    pub model_name: Option<String>,
    pub device_manufacturer: Option<String>,
    #[serde(default)]
    pub last_reading: Reading,
    pub units: Option<Units>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Units {
    /// `"c"` or `"f"`: the unit the user chose in the Wink app.
    pub temperature: Option<String>,
}

/// The union of the `last_reading` fields used by the supported devices.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Reading {
    pub connection: Option<bool>,
    pub powered: Option<bool>,
    /// 0.0 – 1.0
    pub brightness: Option<f64>,
    /// 0.0 – 1.0
    pub hue: Option<f64>,
    /// 0.0 – 1.0
    pub saturation: Option<f64>,
    pub color_model: Option<String>,
    pub color_temperature: Option<u32>,

    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub min_set_point: Option<f64>,
    pub max_set_point: Option<f64>,
    pub mode: Option<String>,
    pub modes_allowed: Option<Vec<String>>,
    pub users_away: Option<bool>,
    pub humidity: Option<f64>,
    pub fan_mode: Option<String>,

    pub opened: Option<bool>,
    pub motion: Option<bool>,
    pub presence: Option<bool>,
    pub liquid_detected: Option<bool>,
    /// 0.0 – 1.0
    pub battery: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct SubscriptionData {
    pub subscription_id: String,
    /// Unix seconds.
    pub expires_at: Option<i64>,
}

/// URL collection for an object type: `light_bulb` → `light_bulbs`,
/// `binary_switch` → `binary_switches`.
pub fn collection(object_type: &str) -> String {
    if object_type.ends_with("switch") {
        format!("{}es", object_type)
    } else {
        format!("{}s", object_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pluralizes_types() {
        assert_eq!(collection("light_bulb"), "light_bulbs");
        assert_eq!(collection("binary_switch"), "binary_switches");
        assert_eq!(collection("thermostat"), "thermostats");
    }

    #[test]
    fn parses_device_list() {
        let list: Envelope<Vec<Device>> = serde_json::from_value(json!({
            "data": [
                { "object_type": "light_bulb", "object_id": "1", "name": "Desk",
                  "last_reading": { "powered": true, "brightness": 0.5, "connection": true } },
                { "object_type": "hub", "object_id": "2", "name": "Hub" }
            ],
            "pagination": { "count": 2 }
        })).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].last_reading.brightness, Some(0.5));
        assert_eq!(list.data[1].last_reading, Reading::default());
    }
}
