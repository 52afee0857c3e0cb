/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::Action;
use super::structs::Device;
use super::{ COOL_SETPOINT, HEAT_SETPOINT, HVAC_FAN, HVAC_MODE };
use crate::error::{ Error, Result };
use crate::schema::{ HvacMode, Schema, Temperature, TemperatureUnit, ThermostatState, ThermostatUpdate };
use crate::translator::TranslatorManifest;

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-vera-thermostat",
    vendor: "vera",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperature", "targetTemperatureHigh",
                 "targetTemperatureLow", "hvacMode", "ecoMode", "fanActive"],
    writable: &["targetTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                "hvacMode", "fanActive"],
};

fn hvac_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "AutoChangeOver" => Some(HvacMode::Auto),
        "HeatOn" => Some(HvacMode::HeatOnly),
        "CoolOn" => Some(HvacMode::CoolOnly),
        "EconomyHeatOn" => Some(HvacMode::Eco),
        "Off" => Some(HvacMode::Off),
        _ => None,
    }
}

fn vera_mode(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Auto => "AutoChangeOver",
        HvacMode::HeatOnly => "HeatOn",
        HvacMode::CoolOnly => "CoolOn",
        HvacMode::Eco => "EconomyHeatOn",
        HvacMode::Off => "Off",
    }
}

/// The set point a plain target moves in `mode`, if there is a single one.
fn target_setpoint(mode: Option<&str>) -> Option<&'static str> {
    match mode {
        Some("HeatOn") | Some("EconomyHeatOn") => Some(HEAT_SETPOINT),
        Some("CoolOn") => Some(COOL_SETPOINT),
        _ => None,
    }
}

pub fn state(device: &Device, unit: TemperatureUnit) -> ThermostatState {
    let temperature = |v: Option<f64>| v.map(|value| Temperature { value: value, unit: unit });
    let mode = device.mode.as_deref();
    let target = match target_setpoint(mode) {
        Some(HEAT_SETPOINT) => device.heat,
        Some(_) => device.cool,
        None => None,
    };
    ThermostatState {
        ambient: temperature(device.temperature),
        target: temperature(target),
        target_high: temperature(device.cool),
        target_low: temperature(device.heat),
        hvac_mode: mode.and_then(hvac_mode),
        supported_modes: HvacMode::ALL.to_vec(),
        away: None,
        eco: mode.map(|m| m == "EconomyHeatOn"),
        humidity: None,
        fan_active: device.fanmode.as_ref().map(|m| m == "ContinuousOn"),
    }
}

fn setpoint(service: &'static str, temperature: &Temperature, unit: TemperatureUnit) -> Action {
    Action {
        service: service,
        action: "SetCurrentSetpoint",
        argument: "NewCurrentSetpoint",
        value: temperature.to(unit).value.to_string(),
    }
}

/// The controller takes one action per request. Everything is checked
/// before the first one is sent.
pub fn actions(update: &ThermostatUpdate, current: &Device, unit: TemperatureUnit) -> Result<Vec<Action>> {
    if update.away.is_some() {
        return Err(Error::NotImplemented("Vera thermostats have no away mode".to_owned()));
    }
    let mut actions = Vec::new();
    let mode = update.hvac_mode.map(vera_mode).or(current.mode.as_deref());
    if let Some(m) = update.hvac_mode {
        actions.push(Action {
            service: HVAC_MODE,
            action: "SetModeTarget",
            argument: "NewModeTarget",
            value: vera_mode(m).to_owned(),
        });
    }
    if let Some(ref target) = update.target {
        let service = target_setpoint(mode).ok_or_else(|| Error::BadRequest(format!(
            "targetTemperature cannot be set in {} mode; use targetTemperatureHigh/Low",
            mode.unwrap_or("unknown"))))?;
        actions.push(setpoint(service, target, unit));
    }
    if let Some(ref high) = update.target_high {
        actions.push(setpoint(COOL_SETPOINT, high, unit));
    }
    if let Some(ref low) = update.target_low {
        actions.push(setpoint(HEAT_SETPOINT, low, unit));
    }
    if let Some(fan) = update.fan_active {
        actions.push(Action {
            service: HVAC_FAN,
            action: "SetMode",
            argument: "NewMode",
            value: (if fan { "ContinuousOn" } else { "Auto" }).to_owned(),
        });
    }
    Ok(actions)
}
