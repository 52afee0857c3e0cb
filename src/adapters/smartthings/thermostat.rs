/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::Attributes;
use crate::error::{ Error, Result };
use crate::schema::{ HvacMode, Schema, Temperature, TemperatureUnit, ThermostatState, ThermostatUpdate };
use crate::translator::TranslatorManifest;
use serde_json::{ json, Map, Value };

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-smartthings-thermostat",
    vendor: "smartthings",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperature", "targetTemperatureHigh",
                 "targetTemperatureLow", "hvacMode", "ecoMode", "humidity", "fanActive"],
    writable: &["targetTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                "hvacMode", "fanActive"],
};

fn hvac_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "auto" => Some(HvacMode::Auto),
        "heat" | "emergency heat" => Some(HvacMode::HeatOnly),
        "cool" => Some(HvacMode::CoolOnly),
        "eco" => Some(HvacMode::Eco),
        "off" => Some(HvacMode::Off),
        _ => None,
    }
}

fn st_mode(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Auto => "auto",
        HvacMode::HeatOnly => "heat",
        HvacMode::CoolOnly => "cool",
        HvacMode::Eco => "eco",
        HvacMode::Off => "off",
    }
}

/// Temperatures are in the location's scale, `unit`.
pub fn state(attributes: &Attributes, unit: TemperatureUnit) -> ThermostatState {
    let temperature = |v: Option<f64>| v.map(|value| Temperature { value: value, unit: unit });
    let mode = attributes.thermostat_mode.as_deref();
    let target = match mode {
        Some("heat") | Some("emergency heat") => attributes.heating_setpoint,
        Some("cool") => attributes.cooling_setpoint,
        _ => attributes.thermostat_setpoint,
    };
    let supported = match attributes.supported_thermostat_modes {
        Some(ref modes) => {
            let mut supported = Vec::new();
            for mode in modes.iter().filter_map(|m| hvac_mode(m)) {
                if !supported.contains(&mode) {
                    supported.push(mode);
                }
            }
            supported
        },
        None => HvacMode::ALL.to_vec(),
    };

    ThermostatState {
        ambient: temperature(attributes.temperature),
        target: temperature(target),
        target_high: temperature(attributes.cooling_setpoint),
        target_low: temperature(attributes.heating_setpoint),
        hvac_mode: mode.and_then(hvac_mode),
        supported_modes: supported,
        away: None,
        eco: mode.map(|m| m == "eco"),
        humidity: attributes.humidity,
        fan_active: attributes.thermostat_fan_mode.as_ref().map(|m| m == "on"),
    }
}

/// Maps an update onto SmartApp attributes. A plain target moves the set
/// point of the mode being switched to, or else of the current mode.
pub fn command(update: &ThermostatUpdate, current: &Attributes, unit: TemperatureUnit) -> Result<Value> {
    if update.away.is_some() {
        return Err(Error::NotImplemented("SmartThings thermostats have no away mode".to_owned()));
    }
    let value = |t: &Temperature| json!(t.to(unit).value);
    let mut body = Map::new();

    let mode = update.hvac_mode.map(st_mode).or(current.thermostat_mode.as_deref());
    if let Some(m) = update.hvac_mode {
        body.insert("thermostatMode".to_owned(), json!(st_mode(m)));
    }
    if let Some(ref target) = update.target {
        let key = match mode {
            Some("heat") | Some("emergency heat") => "heatingSetpoint",
            Some("cool") => "coolingSetpoint",
            other => {
                return Err(Error::BadRequest(format!(
                    "targetTemperature cannot be set in {} mode; use targetTemperatureHigh/Low",
                    other.unwrap_or("unknown"))));
            },
        };
        body.insert(key.to_owned(), value(target));
    }
    if let Some(ref high) = update.target_high {
        body.insert("coolingSetpoint".to_owned(), value(high));
    }
    if let Some(ref low) = update.target_low {
        body.insert("heatingSetpoint".to_owned(), value(low));
    }
    if let Some(fan) = update.fan_active {
        body.insert("thermostatFanMode".to_owned(), json!(if fan { "on" } else { "auto" }));
    }
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> Attributes {
        Attributes {
            temperature: Some(71.0),
            heating_setpoint: Some(68.0),
            cooling_setpoint: Some(76.0),
            thermostat_mode: Some("heat".to_owned()),
            supported_thermostat_modes: Some(vec!["heat".to_owned(), "emergency heat".to_owned(),
                                                  "off".to_owned()]),
            thermostat_fan_mode: Some("auto".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn reads_setpoints() {
        let s = state(&attributes(), TemperatureUnit::F);
        assert_eq!(s.target, Some(Temperature::fahrenheit(68.0)));
        assert_eq!(s.target_high, Some(Temperature::fahrenheit(76.0)));
        assert_eq!(s.hvac_mode, Some(HvacMode::HeatOnly));
        assert_eq!(s.supported_modes, vec![HvacMode::HeatOnly, HvacMode::Off]);
        assert_eq!(s.fan_active, Some(false));
        assert_eq!(s.away, None);
    }

    #[test]
    fn builds_commands() {
        let update = ThermostatUpdate {
            target: Some(Temperature::celsius(25.0)),
            hvac_mode: Some(HvacMode::CoolOnly),
            fan_active: Some(true),
            ..Default::default()
        };
        assert_eq!(command(&update, &attributes(), TemperatureUnit::F).unwrap(), json!({
            "thermostatMode": "cool",
            "coolingSetpoint": 77.0,
            "thermostatFanMode": "on"
        }));
    }

    #[test]
    fn away_is_not_supported() {
        let update = ThermostatUpdate { away: Some(true), ..Default::default() };
        assert_eq!(command(&update, &attributes(), TemperatureUnit::F).unwrap_err().status(), 501);
    }
}
