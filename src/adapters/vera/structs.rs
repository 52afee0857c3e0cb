/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::{ Deserialize, Deserializer };
use serde_json::Value;

/// Device categories of the controller that have translators.
pub const CATEGORY_DIMMABLE_LIGHT: u32 = 2;
pub const CATEGORY_SWITCH: u32 = 3;
pub const CATEGORY_SECURITY_SENSOR: u32 = 4;
pub const CATEGORY_HVAC: u32 = 5;
pub const CATEGORY_HUMIDITY_SENSOR: u32 = 16;
pub const CATEGORY_TEMPERATURE_SENSOR: u32 = 17;

/// Reply of `data_request?id=sdata`: every device, with its state
/// variables flattened into the device object.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SData {
    /// Temperature scale of the controller, `C` or `F`.
    pub temperature: Option<String>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// The controller reports most numbers as strings (`"status": "1"`), and
/// some firmware as numbers.
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
    where D: Deserializer<'de>
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub category: u32,
    #[serde(default)]
    pub subcategory: u32,

    #[serde(default, deserialize_with = "lenient_number")]
    pub status: Option<f64>,
    /// 0 – 100
    #[serde(default, deserialize_with = "lenient_number")]
    pub level: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub heat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cool: Option<f64>,
    /// `Off`, `HeatOn`, `CoolOn`, `AutoChangeOver` or `EconomyHeatOn`.
    pub mode: Option<String>,
    /// `Auto`, `ContinuousOn` or `PeriodicOn`.
    pub fanmode: Option<String>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub tripped: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub batterylevel: Option<f64>,
}

impl Device {
    pub fn is_on(&self) -> bool {
        self.status.map_or(false, |s| s > 0.0)
    }

    pub fn is_tripped(&self) -> Option<bool> {
        self.tripped.map(|t| t > 0.0)
    }
}

/// Translator kind of a category, or `category-<n>` when there is none.
/// Security sensors are told apart by subcategory.
pub fn kind(category: u32, subcategory: u32) -> String {
    let kind = match (category, subcategory) {
        (CATEGORY_DIMMABLE_LIGHT, _) => "dimmable_light",
        (CATEGORY_SWITCH, _) => "switch",
        (CATEGORY_SECURITY_SENSOR, 1) => "door_sensor",
        (CATEGORY_SECURITY_SENSOR, 2) => "leak_sensor",
        (CATEGORY_SECURITY_SENSOR, 3) => "motion_sensor",
        (CATEGORY_HVAC, _) => "thermostat",
        (CATEGORY_HUMIDITY_SENSOR, _) => "humidity_sensor",
        (CATEGORY_TEMPERATURE_SENSOR, _) => "temperature_sensor",
        _ => return format!("category-{}-{}", category, subcategory),
    };
    kind.to_owned()
}

pub fn model(device: &Device) -> String {
    match device.category {
        CATEGORY_DIMMABLE_LIGHT => "Dimmable Light".to_owned(),
        CATEGORY_SWITCH => "Switch".to_owned(),
        CATEGORY_SECURITY_SENSOR => "Security Sensor".to_owned(),
        CATEGORY_HVAC => "Thermostat".to_owned(),
        CATEGORY_HUMIDITY_SENSOR => "Humidity Sensor".to_owned(),
        CATEGORY_TEMPERATURE_SENSOR => "Temperature Sensor".to_owned(),
        other => format!("Category {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_may_be_strings() {
        let sdata: SData = serde_json::from_value(json!({
            "full": 1,
            "temperature": "F",
            "devices": [
                { "id": 5, "name": "Lamp", "category": 2, "subcategory": 0, "status": "1", "level": "45" },
                { "id": 6, "name": "Door", "category": 4, "subcategory": 1, "tripped": 0, "batterylevel": "" }
            ]
        })).unwrap();
        assert_eq!(sdata.temperature.as_deref(), Some("F"));
        assert!(sdata.devices[0].is_on());
        assert_eq!(sdata.devices[0].level, Some(45.0));
        assert_eq!(sdata.devices[1].is_tripped(), Some(false));
        assert_eq!(sdata.devices[1].batterylevel, None);
    }

    #[test]
    fn kinds_follow_category() {
        assert_eq!(kind(2, 0), "dimmable_light");
        assert_eq!(kind(4, 3), "motion_sensor");
        assert_eq!(kind(4, 4), "category-4-4");
        assert_eq!(kind(8, 1), "category-8-1");
    }
}
