/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::{ Action, VeraApi };
use super::structs::{ self, Device };
use super::{ thermostat, VeraDevice, DIMMING, SWITCH_POWER };
use crate::error::{ Error, Result };
use crate::schema::{ DeviceState, DeviceUpdate, LampState, LampUpdate, MultisensorState, PlatformInfo,
                     Schema, SwitchState, Temperature, TemperatureUnit };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

pub static LIGHT_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-vera-lightbulb",
    vendor: "vera",
    schema: Schema::Lamp,
    resources: &["power", "dim"],
    writable: &["power", "dim"],
};

pub static SWITCH_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-vera-binaryswitch",
    vendor: "vera",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub static SENSOR_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-vera-multisensor",
    vendor: "vera",
    schema: Schema::Multisensor,
    resources: &["contact", "motion", "water", "temperature", "humidity", "battery"],
    writable: &[],
};

pub struct VeraTranslator {
    id: u32,
    control_id: String,
    api: Arc<VeraApi>,
    manifest: &'static TranslatorManifest,
}

impl VeraTranslator {
    fn new(device: VeraDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} for Vera device {}", manifest.name, device.id);
        VeraTranslator {
            id: device.id,
            control_id: device.id.to_string(),
            api: device.api,
            manifest: manifest,
        }
    }

    pub fn light(device: VeraDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &LIGHT_MANIFEST))
    }

    pub fn switch(device: VeraDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SWITCH_MANIFEST))
    }

    pub fn thermostat(device: VeraDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &thermostat::MANIFEST))
    }

    pub fn sensor(device: VeraDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SENSOR_MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for VeraTranslator {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.control_id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let (device, unit) = self.api.get_device(self.id).await?;
        snapshot(self.manifest, &device, unit)
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let actions = match *update {
            DeviceUpdate::Lamp(ref u) => light_actions(u)?,
            DeviceUpdate::BinarySwitch(ref u) => u.on.map(power).into_iter().collect(),
            DeviceUpdate::Thermostat(ref u) => {
                let (current, unit) = self.api.get_device(self.id).await?;
                thermostat::actions(u, &current, unit)?
            },
        };
        for action in &actions {
            info!("Vera device {}: {} {}={}", self.id, action.action, action.argument, action.value);
            self.api.action(self.id, action).await?;
        }
        Ok(())
    }
}

fn power(on: bool) -> Action {
    Action {
        service: SWITCH_POWER,
        action: "SetTarget",
        argument: "newTargetValue",
        value: (if on { "1" } else { "0" }).to_owned(),
    }
}

/// Setting a load level switches the light on; level 0 switches it off.
pub fn light_actions(update: &LampUpdate) -> Result<Vec<Action>> {
    if update.rgb.is_some() || update.temperature_k.is_some() {
        return Err(Error::BadRequest("Vera lights have no colour control".to_owned()));
    }
    Ok(match (update.on, update.dim) {
        (Some(false), _) | (_, Some(0)) => vec![power(false)],
        (_, Some(dim)) => vec![Action {
            service: DIMMING,
            action: "SetLoadLevelTarget",
            argument: "newLoadlevelTarget",
            value: dim.to_string(),
        }],
        (Some(true), None) => vec![power(true)],
        (None, None) => Vec::new(),
    })
}

pub fn sensor_state(device: &Device, unit: TemperatureUnit) -> MultisensorState {
    let tripped = |subcategory: u32| {
        if device.category == structs::CATEGORY_SECURITY_SENSOR && device.subcategory == subcategory {
            device.is_tripped()
        } else {
            None
        }
    };
    let temperature = match device.category {
        structs::CATEGORY_TEMPERATURE_SENSOR => device.temperature,
        _ => None,
    };
    MultisensorState {
        contact: tripped(1),
        water: tripped(2),
        motion: tripped(3),
        presence: None,
        temperature: temperature.map(|v| Temperature { value: v, unit: unit }),
        humidity: device.humidity,
        battery: device.batterylevel,
    }
}

pub fn snapshot(manifest: &TranslatorManifest, device: &Device, unit: TemperatureUnit) -> Result<Snapshot> {
    let state = match manifest.schema {
        Schema::Lamp => DeviceState::Lamp(LampState {
            on: device.is_on(),
            dim: device.level.map(|l| l.round().max(0.0).min(100.0) as u8),
            ..Default::default()
        }),
        Schema::BinarySwitch => DeviceState::BinarySwitch(SwitchState { on: device.is_on() }),
        Schema::Thermostat => DeviceState::Thermostat(thermostat::state(device, unit)),
        Schema::Multisensor => DeviceState::Multisensor(sensor_state(device, unit)),
        Schema::Hub => return Err(Error::NotImplemented(format!("{} is not a device", manifest.name))),
    };
    Ok(Snapshot {
        info: PlatformInfo {
            control_id: device.id.to_string(),
            name: device.name.clone(),
            manufacturer: "Vera".to_owned(),
            model: structs::model(device),
        },
        state: state,
    })
}
