/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::NestApi;
use super::structs::{ Structure, Thermostat };
use super::NestDevice;
use crate::error::{ Error, Result };
use crate::schema::{ DeviceState, DeviceUpdate, HvacMode, PlatformInfo, Schema, Temperature,
                     TemperatureUnit, ThermostatState, ThermostatUpdate };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info, warn };
use serde_json::{ json, Map, Value };
use std::sync::Arc;

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-nest-thermostat",
    vendor: "nest",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperature", "targetTemperatureHigh",
                 "targetTemperatureLow", "hvacMode", "awayMode", "ecoMode", "humidity", "fanActive"],
    writable: &["targetTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                "hvacMode", "awayMode", "fanActive"],
};

pub struct NestThermostat {
    id: String,
    api: Arc<NestApi>,
}

impl NestThermostat {
    pub fn build(device: NestDevice) -> Arc<dyn DeviceTranslator> {
        debug!("Creating {} with ID {}", MANIFEST.name, device.device_id);
        Arc::new(NestThermostat { id: device.device_id, api: device.api })
    }

    async fn structure(&self, thermostat: &Thermostat) -> Option<Structure> {
        let sid = thermostat.structure_id.as_ref()?;
        match self.api.get_structure(sid).await {
            Ok(structure) => Some(structure),
            Err(e) => {
                warn!("Unable to read Nest structure {}: {}", sid, e);
                None
            }
        }
    }
}

#[async_trait]
impl DeviceTranslator for NestThermostat {
    fn manifest(&self) -> &'static TranslatorManifest {
        &MANIFEST
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let thermostat = self.api.get_thermostat(&self.id).await?;
        let structure = self.structure(&thermostat).await;
        Ok(snapshot(&thermostat, structure.as_ref()))
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let update = match *update {
            DeviceUpdate::Thermostat(ref u) => u,
            _ => return Err(Error::BadRequest(format!("{} is a thermostat", self.id))),
        };
        let current = self.api.get_thermostat(&self.id).await?;

        let body = thermostat_body(update, scale(&current));
        if !body.as_object().map_or(true, Map::is_empty) {
            info!("Setting Nest thermostat {}: {}", self.id, body);
            self.api.put_thermostat(&self.id, &body).await?;
        }

        if let Some(away) = update.away {
            let sid = current.structure_id.as_ref().ok_or_else(|| {
                Error::BadRequest(format!("thermostat {} has no structure for awayMode", self.id))
            })?;
            info!("Setting Nest structure {} away={}", sid, away);
            let state = if away { "away" } else { "home" };
            self.api.put_structure(sid, &json!({ "away": state })).await?;
        }
        Ok(())
    }
}

fn scale(thermostat: &Thermostat) -> TemperatureUnit {
    thermostat.temperature_scale.as_deref()
        .and_then(TemperatureUnit::parse)
        .unwrap_or(TemperatureUnit::C)
}

fn hvac_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "heat" => Some(HvacMode::HeatOnly),
        "cool" => Some(HvacMode::CoolOnly),
        "heat-cool" => Some(HvacMode::Auto),
        "eco" => Some(HvacMode::Eco),
        "off" => Some(HvacMode::Off),
        _ => None,
    }
}

fn nest_mode(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::HeatOnly => "heat",
        HvacMode::CoolOnly => "cool",
        HvacMode::Auto => "heat-cool",
        HvacMode::Eco => "eco",
        HvacMode::Off => "off",
    }
}

/// Nest accepts whole degrees Fahrenheit and half degrees Celsius.
fn device_value(t: &Temperature, unit: TemperatureUnit) -> f64 {
    let value = t.to(unit).value;
    match unit {
        TemperatureUnit::F => value.round(),
        TemperatureUnit::C => (value * 2.0).round() / 2.0,
    }
}

pub fn snapshot(thermostat: &Thermostat, structure: Option<&Structure>) -> Snapshot {
    let unit = scale(thermostat);
    let temperature = |c: Option<f64>, f: Option<f64>| {
        let value = match unit {
            TemperatureUnit::C => c,
            TemperatureUnit::F => f,
        };
        value.map(|v| Temperature { value: v, unit: unit })
    };

    let mut supported = Vec::new();
    if thermostat.can_heat && thermostat.can_cool {
        supported.push(HvacMode::Auto);
    }
    if thermostat.can_heat {
        supported.push(HvacMode::HeatOnly);
    }
    if thermostat.can_cool {
        supported.push(HvacMode::CoolOnly);
    }
    supported.push(HvacMode::Eco);
    supported.push(HvacMode::Off);

    let state = ThermostatState {
        ambient: temperature(thermostat.ambient_temperature_c, thermostat.ambient_temperature_f),
        target: temperature(thermostat.target_temperature_c, thermostat.target_temperature_f),
        target_high: temperature(thermostat.target_temperature_high_c, thermostat.target_temperature_high_f),
        target_low: temperature(thermostat.target_temperature_low_c, thermostat.target_temperature_low_f),
        hvac_mode: thermostat.hvac_mode.as_deref().and_then(hvac_mode),
        supported_modes: supported,
        away: structure.and_then(|s| s.away.as_ref()).map(|a| a != "home"),
        eco: thermostat.hvac_mode.as_ref().map(|m| m == "eco"),
        humidity: thermostat.humidity,
        fan_active: if thermostat.has_fan { thermostat.fan_timer_active } else { None },
    };

    Snapshot {
        info: PlatformInfo {
            control_id: thermostat.device_id.clone(),
            name: thermostat.name_long.clone().unwrap_or_else(|| thermostat.name.clone()),
            manufacturer: "Nest".to_owned(),
            model: "Thermostat".to_owned(),
        },
        state: DeviceState::Thermostat(state),
    }
}

/// The thermostat fields of `update`, with temperatures suffixed and
/// rounded for the device's scale. Away is a structure setting and is not
/// part of this body.
pub fn thermostat_body(update: &ThermostatUpdate, unit: TemperatureUnit) -> Value {
    let suffix = match unit {
        TemperatureUnit::C => "c",
        TemperatureUnit::F => "f",
    };
    let mut body = Map::new();
    let targets = [
        ("target_temperature", &update.target),
        ("target_temperature_high", &update.target_high),
        ("target_temperature_low", &update.target_low),
    ];
    for &(field, value) in targets.iter() {
        if let Some(ref t) = *value {
            body.insert(format!("{}_{}", field, suffix), json!(device_value(t, unit)));
        }
    }
    if let Some(mode) = update.hvac_mode {
        body.insert("hvac_mode".to_owned(), json!(nest_mode(mode)));
    }
    if let Some(fan) = update.fan_active {
        body.insert("fan_timer_active".to_owned(), json!(fan));
    }
    Value::Object(body)
}
