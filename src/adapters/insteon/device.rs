/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::InsteonApi;
use super::structs::{ CommandRequest, StatusResponse };
use super::InsteonDevice;
use crate::error::{ Error, Result };
use crate::schema::{ DeviceState, DeviceUpdate, HvacMode, LampState, LampUpdate, PlatformInfo, Schema,
                     SwitchState, Temperature, ThermostatState };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

pub static LIGHT_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-insteon-lightbulb",
    vendor: "insteon",
    schema: Schema::Lamp,
    resources: &["power", "dim"],
    writable: &["power", "dim"],
};

pub static SWITCH_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-insteon-binaryswitch",
    vendor: "insteon",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub static THERMOSTAT_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-insteon-thermostat",
    vendor: "insteon",
    schema: Schema::Thermostat,
    resources: &["ambientTemperature", "targetTemperatureHigh", "targetTemperatureLow",
                 "hvacMode", "humidity", "fanActive"],
    writable: &[],
};

pub struct InsteonTranslator {
    id: String,
    device_id: u64,
    name: String,
    model: String,
    api: Arc<InsteonApi>,
    manifest: &'static TranslatorManifest,
}

impl InsteonTranslator {
    fn new(device: InsteonDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} with ID {}", manifest.name, device.entry.device_id);
        InsteonTranslator {
            id: device.entry.device_id.to_string(),
            device_id: device.entry.device_id,
            model: format!("DevCat {} SubCat {}", device.entry.dev_cat, device.entry.sub_cat),
            name: device.entry.name,
            api: device.api,
            manifest: manifest,
        }
    }

    pub fn light(device: InsteonDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &LIGHT_MANIFEST))
    }

    pub fn switch(device: InsteonDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SWITCH_MANIFEST))
    }

    pub fn thermostat(device: InsteonDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &THERMOSTAT_MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for InsteonTranslator {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let status = self.api.run(&CommandRequest {
            command: "get_status",
            device_id: self.device_id,
            level: None,
        }).await?;
        Ok(Snapshot {
            info: PlatformInfo {
                control_id: self.id.clone(),
                name: self.name.clone(),
                manufacturer: "Insteon".to_owned(),
                model: self.model.clone(),
            },
            state: state(self.manifest.schema, &status)?,
        })
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let lamp = match *update {
            DeviceUpdate::Lamp(ref u) => u.clone(),
            DeviceUpdate::BinarySwitch(ref u) => LampUpdate { on: u.on, ..Default::default() },
            DeviceUpdate::Thermostat(_) => {
                return Err(Error::NotImplemented("Insteon thermostat commands".to_owned()));
            },
        };
        if lamp.rgb.is_some() || lamp.temperature_k.is_some() {
            return Err(Error::BadRequest(format!("Insteon device {} has no colour control", self.id)));
        }
        if let Some(request) = command(self.device_id, &lamp) {
            info!("Sending Insteon {} to device {}", request.command, self.id);
            self.api.run(&request).await?;
        }
        Ok(())
    }
}

fn thermostat_mode(raw: &str) -> Option<HvacMode> {
    match raw {
        "auto" => Some(HvacMode::Auto),
        "heat" => Some(HvacMode::HeatOnly),
        "cool" => Some(HvacMode::CoolOnly),
        "off" => Some(HvacMode::Off),
        _ => None,
    }
}

pub fn state(schema: Schema, status: &StatusResponse) -> Result<DeviceState> {
    let level = status.level.unwrap_or(0.0).max(0.0).min(100.0);
    match schema {
        Schema::Lamp => Ok(DeviceState::Lamp(LampState {
            on: level > 0.0,
            dim: Some(level.round() as u8),
            ..Default::default()
        })),
        Schema::BinarySwitch => Ok(DeviceState::BinarySwitch(SwitchState { on: level > 0.0 })),
        Schema::Thermostat => Ok(DeviceState::Thermostat(ThermostatState {
            ambient: status.temp.map(Temperature::fahrenheit),
            target: None,
            target_high: status.cool_point.map(Temperature::fahrenheit),
            target_low: status.heat_point.map(Temperature::fahrenheit),
            hvac_mode: status.mode.as_deref().and_then(thermostat_mode),
            supported_modes: vec![HvacMode::Auto, HvacMode::HeatOnly, HvacMode::CoolOnly, HvacMode::Off],
            away: None,
            eco: None,
            humidity: status.humidity,
            fan_active: status.fan.as_ref().map(|f| f == "on"),
        })),
        other => Err(Error::NotImplemented(format!("Insteon {} devices", other))),
    }
}

/// `on` with a level, or `off`. Dimming to zero turns the device off; an
/// empty update sends nothing.
pub fn command(device_id: u64, update: &LampUpdate) -> Option<CommandRequest> {
    let on = match (update.on, update.dim) {
        (Some(false), _) | (None, Some(0)) => false,
        (Some(true), _) | (None, Some(_)) => true,
        (None, None) => return None,
    };
    Some(if on {
        CommandRequest {
            command: "on",
            device_id: device_id,
            level: Some(update.dim.filter(|&d| d > 0).unwrap_or(100)),
        }
    } else {
        CommandRequest { command: "off", device_id: device_id, level: None }
    })
}
