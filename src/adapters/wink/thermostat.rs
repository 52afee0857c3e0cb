/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Device, Reading };
use crate::error::{ Error, Result };
use crate::schema::{ HvacMode, Schema, Temperature, TemperatureUnit, ThermostatState, ThermostatUpdate };
use crate::translator::TranslatorManifest;
use serde_json::{ json, Map, Value };

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-wink-thermostat",
    vendor: "wink",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperature", "targetTemperatureHigh",
                 "targetTemperatureLow", "hvacMode", "awayMode", "ecoMode", "humidity", "fanActive"],
    writable: &["targetTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                "hvacMode", "awayMode", "fanActive"],
};

const HEAT_ONLY: &str = "heat_only";
const COOL_ONLY: &str = "cool_only";

fn wink_mode(mode: HvacMode) -> Option<&'static str> {
    match mode {
        HvacMode::Auto => Some("auto"),
        HvacMode::HeatOnly => Some(HEAT_ONLY),
        HvacMode::CoolOnly => Some(COOL_ONLY),
        HvacMode::Eco => Some("eco"),
        HvacMode::Off => None,
    }
}

fn hvac_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "auto" => Some(HvacMode::Auto),
        HEAT_ONLY => Some(HvacMode::HeatOnly),
        COOL_ONLY => Some(HvacMode::CoolOnly),
        "eco" => Some(HvacMode::Eco),
        _ => None,
    }
}

/// The unit the account displays temperatures in. Wink itself always
/// reports Celsius.
pub fn display_unit(device: &Device) -> TemperatureUnit {
    device.units.as_ref()
        .and_then(|u| u.temperature.as_deref())
        .and_then(TemperatureUnit::parse)
        .unwrap_or(TemperatureUnit::C)
}

pub fn state(reading: &Reading, unit: TemperatureUnit) -> ThermostatState {
    let temperature = |v: Option<f64>| v.map(|c| Temperature::celsius(c).to(unit));
    let mode = if reading.powered == Some(false) {
        Some(HvacMode::Off)
    } else {
        reading.mode.as_deref().and_then(hvac_mode)
    };
    let target = match reading.mode.as_deref() {
        Some(HEAT_ONLY) => temperature(reading.min_set_point),
        Some(COOL_ONLY) => temperature(reading.max_set_point),
        _ => None,
    };
    let mut supported: Vec<HvacMode> = reading.modes_allowed.iter()
        .flatten()
        .filter_map(|m| hvac_mode(m))
        .collect();
    supported.push(HvacMode::Off);

    ThermostatState {
        ambient: temperature(reading.temperature),
        target: target,
        target_high: temperature(reading.max_set_point),
        target_low: temperature(reading.min_set_point),
        hvac_mode: mode,
        supported_modes: supported,
        away: reading.users_away,
        eco: reading.mode.as_ref().map(|m| m == "eco"),
        humidity: reading.humidity,
        fan_active: reading.fan_mode.as_ref().map(|m| m == "on"),
    }
}

/// Builds the `desired_state` for `update`. A plain target temperature is
/// only meaningful in a single-set-point mode, so the mode being switched
/// to, or else the current one, decides which set point it moves.
pub fn desired_state(update: &ThermostatUpdate, current: &Reading) -> Result<Value> {
    let celsius = |t: &Temperature| t.to(TemperatureUnit::C).value;
    let mut desired = Map::new();

    let mut effective_mode = current.mode.clone();
    if let Some(mode) = update.hvac_mode {
        match wink_mode(mode) {
            None => {
                desired.insert("powered".to_owned(), json!(false));
            },
            Some(raw) => {
                let allowed = current.modes_allowed.as_ref()
                    .map_or(true, |modes| modes.iter().any(|m| m == raw));
                if !allowed {
                    return Err(Error::BadRequest(format!("thermostat does not support {} mode", mode.as_str())));
                }
                desired.insert("powered".to_owned(), json!(true));
                desired.insert("mode".to_owned(), json!(raw));
                effective_mode = Some(raw.to_owned());
            },
        }
    }

    if let Some(ref target) = update.target {
        let key = match effective_mode.as_deref() {
            Some(HEAT_ONLY) => "min_set_point",
            Some(COOL_ONLY) => "max_set_point",
            other => {
                return Err(Error::BadRequest(format!(
                    "targetTemperature cannot be set in {} mode; use targetTemperatureHigh/Low",
                    other.unwrap_or("unknown"))));
            },
        };
        desired.insert(key.to_owned(), json!(celsius(target)));
    }
    if let Some(ref high) = update.target_high {
        desired.insert("max_set_point".to_owned(), json!(celsius(high)));
    }
    if let Some(ref low) = update.target_low {
        desired.insert("min_set_point".to_owned(), json!(celsius(low)));
    }
    if let Some(away) = update.away {
        desired.insert("users_away".to_owned(), json!(away));
    }
    if let Some(fan) = update.fan_active {
        desired.insert("fan_mode".to_owned(), json!(if fan { "on" } else { "auto" }));
    }
    Ok(Value::Object(desired))
}
