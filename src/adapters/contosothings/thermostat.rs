/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::State;
use crate::error::{ Error, Result };
use crate::schema::{ HvacMode, Schema, Temperature, TemperatureUnit, ThermostatState, ThermostatUpdate };
use crate::translator::TranslatorManifest;

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-contosothings-thermostat",
    vendor: "contosothings",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperature", "targetTemperatureHigh",
                 "targetTemperatureLow", "hvacMode", "awayMode", "ecoMode", "humidity", "fanActive"],
    writable: &["targetTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                "hvacMode", "awayMode", "fanActive"],
};

fn hvac_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "auto" => Some(HvacMode::Auto),
        "heat" => Some(HvacMode::HeatOnly),
        "cool" => Some(HvacMode::CoolOnly),
        "eco" => Some(HvacMode::Eco),
        "off" => Some(HvacMode::Off),
        _ => None,
    }
}

fn contoso_mode(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Auto => "auto",
        HvacMode::HeatOnly => "heat",
        HvacMode::CoolOnly => "cool",
        HvacMode::Eco => "eco",
        HvacMode::Off => "off",
    }
}

/// The device's unit; Celsius unless it says otherwise.
pub fn unit(state: &State) -> TemperatureUnit {
    state.temperature_units.as_deref()
        .and_then(TemperatureUnit::parse)
        .unwrap_or(TemperatureUnit::C)
}

pub fn state(current: &State) -> ThermostatState {
    let unit = unit(current);
    let temperature = |v: Option<f64>| v.map(|value| Temperature { value: value, unit: unit });
    let supported = match current.supported_modes {
        Some(ref modes) => modes.iter().filter_map(|m| hvac_mode(m)).collect(),
        None => HvacMode::ALL.to_vec(),
    };
    ThermostatState {
        ambient: temperature(current.ambient_temperature),
        target: temperature(current.target_temperature),
        target_high: temperature(current.target_temperature_high),
        target_low: temperature(current.target_temperature_low),
        hvac_mode: current.hvac_mode.as_deref().and_then(hvac_mode),
        supported_modes: supported,
        away: current.away,
        eco: current.hvac_mode.as_ref().map(|m| m == "eco"),
        humidity: current.humidity,
        fan_active: current.fan_mode.as_ref().map(|m| m == "on"),
    }
}

/// Temperatures are converted to the device's unit. Modes the device does
/// not list are rejected.
pub fn command(update: &ThermostatUpdate, current: &State) -> Result<State> {
    let unit = unit(current);
    let value = |t: &Temperature| t.to(unit).value;
    if let Some(mode) = update.hvac_mode {
        let supported = state(current).supported_modes;
        if !supported.contains(&mode) {
            return Err(Error::BadRequest(format!("hvac mode {} is not supported", mode.as_str())));
        }
    }
    Ok(State {
        target_temperature: update.target.as_ref().map(value),
        target_temperature_high: update.target_high.as_ref().map(value),
        target_temperature_low: update.target_low.as_ref().map(value),
        hvac_mode: update.hvac_mode.map(|m| contoso_mode(m).to_owned()),
        away: update.away,
        fan_mode: update.fan_active.map(|on| (if on { "on" } else { "auto" }).to_owned()),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> State {
        State {
            ambient_temperature: Some(70.0),
            target_temperature: Some(68.0),
            temperature_units: Some("F".to_owned()),
            hvac_mode: Some("heat".to_owned()),
            supported_modes: Some(vec!["heat".to_owned(), "off".to_owned(), "dry".to_owned()]),
            away: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn reads_in_the_device_unit() {
        let s = state(&current());
        assert_eq!(s.ambient, Some(Temperature::fahrenheit(70.0)));
        assert_eq!(s.hvac_mode, Some(HvacMode::HeatOnly));
        assert_eq!(s.supported_modes, vec![HvacMode::HeatOnly, HvacMode::Off]);
        assert_eq!(s.away, Some(false));
        assert_eq!(unit(&State::default()), TemperatureUnit::C);
    }

    #[test]
    fn converts_targets_and_checks_modes() {
        let update = ThermostatUpdate {
            target: Some(Temperature::celsius(20.0)),
            away: Some(true),
            ..Default::default()
        };
        let command = command(&update, &current()).unwrap();
        assert_eq!(command.target_temperature, Some(68.0));
        assert_eq!(command.away, Some(true));
        assert_eq!(command.hvac_mode, None);

        let cool = ThermostatUpdate { hvac_mode: Some(HvacMode::CoolOnly), ..Default::default() };
        assert_eq!(super::command(&cool, &current()).unwrap_err().status(), 400);
    }
}
