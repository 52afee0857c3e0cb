/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::ContosoApi;
use super::structs::{ Device, State };
use super::{ thermostat, ContosoDevice };
use crate::error::{ Error, Result };
use crate::schema::{ ColourMode, DeviceState, DeviceUpdate, LampState, LampUpdate, PlatformInfo, Schema,
                     SwitchState };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

pub static LIGHT_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-contosothings-lightbulb",
    vendor: "contosothings",
    schema: Schema::Lamp,
    resources: &["power", "dim", "colourMode", "colourRGB", "colourTemperature"],
    writable: &["power", "dim", "colourRGB", "colourTemperature"],
};

pub static SWITCH_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-contosothings-binaryswitch",
    vendor: "contosothings",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub struct ContosoTranslator {
    id: String,
    api: Arc<ContosoApi>,
    manifest: &'static TranslatorManifest,
}

impl ContosoTranslator {
    fn new(device: ContosoDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} with ID {}", manifest.name, device.id);
        ContosoTranslator { id: device.id, api: device.api, manifest: manifest }
    }

    pub fn light(device: ContosoDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &LIGHT_MANIFEST))
    }

    pub fn switch(device: ContosoDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SWITCH_MANIFEST))
    }

    pub fn thermostat(device: ContosoDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &thermostat::MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for ContosoTranslator {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let device = self.api.get_device(&self.id).await?;
        snapshot(self.manifest, &device)
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let state = match *update {
            DeviceUpdate::Lamp(ref u) => light_command(u),
            DeviceUpdate::BinarySwitch(ref u) => State { power: u.on.map(power), ..Default::default() },
            DeviceUpdate::Thermostat(ref u) => {
                let current = self.api.get_device(&self.id).await?;
                thermostat::command(u, &current.state)?
            },
        };
        if state.is_empty() {
            return Ok(());
        }
        info!("Setting ContosoThings device {}: {:?}", self.id, state);
        self.api.put_state(&self.id, &state).await
    }
}

fn power(on: bool) -> String {
    (if on { "on" } else { "off" }).to_owned()
}

pub fn light_state(state: &State) -> LampState {
    LampState {
        on: state.power.as_deref() == Some("on"),
        dim: state.brightness.map(|b| b.min(100)),
        mode: match state.color_mode.as_deref() {
            Some("rgb") => Some(ColourMode::Rgb),
            Some("ct") => Some(ColourMode::Temperature),
            _ => None,
        },
        rgb: state.color,
        temperature_k: state.color_temperature,
    }
}

/// Setting a colour also selects its colour mode.
pub fn light_command(update: &LampUpdate) -> State {
    let mode = match (update.rgb, update.temperature_k) {
        (Some(_), _) => Some("rgb"),
        (None, Some(_)) => Some("ct"),
        (None, None) => None,
    };
    State {
        power: update.on.map(power),
        brightness: update.dim,
        color_mode: mode.map(str::to_owned),
        color: update.rgb,
        color_temperature: update.temperature_k,
        ..Default::default()
    }
}

pub fn snapshot(manifest: &TranslatorManifest, device: &Device) -> Result<Snapshot> {
    let state = match manifest.schema {
        Schema::Lamp => DeviceState::Lamp(light_state(&device.state)),
        Schema::BinarySwitch => DeviceState::BinarySwitch(SwitchState {
            on: device.state.power.as_deref() == Some("on"),
        }),
        Schema::Thermostat => DeviceState::Thermostat(thermostat::state(&device.state)),
        Schema::Multisensor | Schema::Hub =>
            return Err(Error::NotImplemented(format!("{} has no {} devices", manifest.name, manifest.schema))),
    };
    Ok(Snapshot {
        info: PlatformInfo {
            control_id: device.id.clone(),
            name: device.name.clone(),
            manufacturer: device.manufacturer.clone().unwrap_or_else(|| "ContosoThings".to_owned()),
            model: device.model.clone().unwrap_or_else(|| device.kind.clone()),
        },
        state: state,
    })
}
