/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::{ Deserialize, Serialize };
use std::collections::BTreeMap;

/// `GET /devices`. Only thermostats are translated; other device classes
/// are present in the listing but ignored.
#[derive(Deserialize, Debug, Default)]
pub struct Devices {
    #[serde(default)]
    pub thermostats: BTreeMap<String, Thermostat>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Thermostat {
    pub device_id: String,
    #[serde(default)]
    pub name: String,
    pub name_long: Option<String>,
    pub structure_id: Option<String>,
    /// `"C"` or `"F"`.
    pub temperature_scale: Option<String>,
    pub hvac_mode: Option<String>,
    #[serde(default)]
    pub can_heat: bool,
    #[serde(default)]
    pub can_cool: bool,
    #[serde(default)]
    pub has_fan: bool,
    pub fan_timer_active: Option<bool>,
    pub humidity: Option<f64>,
    pub is_online: Option<bool>,

    pub ambient_temperature_c: Option<f64>,
    pub ambient_temperature_f: Option<f64>,
    pub target_temperature_c: Option<f64>,
    pub target_temperature_f: Option<f64>,
    pub target_temperature_high_c: Option<f64>,
    pub target_temperature_high_f: Option<f64>,
    pub target_temperature_low_c: Option<f64>,
    pub target_temperature_low_f: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Structure {
    /// `"home"`, `"away"` or `"auto-away"`.
    pub away: Option<String>,
    pub name: Option<String>,
}
