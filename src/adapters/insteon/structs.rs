/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde::{ Deserialize, Serialize };

/// `GET /devices?properties=all`
#[derive(Deserialize, Debug, Default)]
pub struct DeviceList {
    #[serde(rename = "DeviceList", default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DeviceEntry {
    #[serde(rename = "DeviceID")]
    pub device_id: u64,
    #[serde(rename = "DeviceName", default)]
    pub name: String,
    #[serde(rename = "DevCat")]
    pub dev_cat: u32,
    #[serde(rename = "SubCat", default)]
    pub sub_cat: u32,
    #[serde(rename = "InsteonID")]
    pub insteon_id: Option<String>,
}

/// Device categories used to pick a translator.
pub const DEVCAT_DIMMABLE: u32 = 1;
pub const DEVCAT_SWITCHED: u32 = 2;
pub const DEVCAT_CLIMATE: u32 = 5;

pub const KIND_DIMMABLE: &str = "dimmable";
pub const KIND_SWITCHED: &str = "switched";
pub const KIND_THERMOSTAT: &str = "thermostat";

/// Translator map key for a device category.
pub fn kind(dev_cat: u32) -> String {
    match dev_cat {
        DEVCAT_DIMMABLE => KIND_DIMMABLE.to_owned(),
        DEVCAT_SWITCHED => KIND_SWITCHED.to_owned(),
        DEVCAT_CLIMATE => KIND_THERMOSTAT.to_owned(),
        other => format!("devcat-{}", other),
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CommandRequest {
    pub command: &'static str,
    pub device_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

/// A queued command, as returned by `POST /commands` and `GET /commands/<id>`.
#[derive(Deserialize, Debug, Clone)]
pub struct Command {
    pub id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub response: StatusResponse,
}

pub const STATUS_SUCCEEDED: &str = "succeeded";
pub const STATUS_FAILED: &str = "failed";

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StatusResponse {
    /// 0 – 100
    pub level: Option<f64>,

    // Thermostats, in degrees Fahrenheit.
    pub temp: Option<f64>,
    pub cool_point: Option<f64>,
    pub heat_point: Option<f64>,
    pub mode: Option<String>,
    pub fan: Option<String>,
    pub humidity: Option<f64>,
}
