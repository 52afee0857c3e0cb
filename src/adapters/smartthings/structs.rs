/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::{ Deserialize, Serialize };

/// One entry of the SmartApp endpoints listing.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub uri: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub label: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "deviceType")]
    pub device_type: String,
    #[serde(default)]
    pub attributes: Attributes,
}

/// Capability attributes as the SmartApp reports them. Strings are
/// SmartThings enum values such as `"on"`, `"open"`, `"active"`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub switch: Option<String>,
    /// 0 – 100
    pub level: Option<f64>,
    /// 0 – 100
    pub hue: Option<f64>,
    /// 0 – 100
    pub saturation: Option<f64>,
    pub color_temperature: Option<u32>,
    pub color_mode: Option<String>,

    pub temperature: Option<f64>,
    pub heating_setpoint: Option<f64>,
    pub cooling_setpoint: Option<f64>,
    pub thermostat_setpoint: Option<f64>,
    pub thermostat_mode: Option<String>,
    pub supported_thermostat_modes: Option<Vec<String>>,
    pub thermostat_fan_mode: Option<String>,
    pub humidity: Option<f64>,

    pub contact: Option<String>,
    pub motion: Option<String>,
    pub presence: Option<String>,
    pub water: Option<String>,
    pub battery: Option<f64>,
}
