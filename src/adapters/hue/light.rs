/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::hub_api::HubApi;
use super::structs::{ LightCommand, LightEntry, LightState };
use super::HueDevice;
use crate::color;
use crate::error::{ Error, Result };
use crate::schema::{ ColourMode, DeviceState, DeviceUpdate, LampState, LampUpdate, PlatformInfo,
                     Schema, SwitchState };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

const MAX_BRI: f64 = 254.0;
const MAX_HUE: f64 = 65535.0;

pub static LAMP_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-hue-bulb",
    vendor: "hue",
    schema: Schema::Lamp,
    resources: &["power", "dim", "colourMode", "colourRGB", "colourTemperature"],
    writable: &["power", "dim", "colourRGB", "colourTemperature"],
};

pub static PLUG_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-hue-plug",
    vendor: "hue",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub struct Light {
    id: String,
    api: Arc<HubApi>,
    manifest: &'static TranslatorManifest,
}

impl Light {
    fn new(device: HueDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} with ID {} on hub {}", manifest.name, device.light_id, device.api.id);
        Light {
            id: device.light_id,
            api: device.api,
            manifest: manifest,
        }
    }

    pub fn lamp(device: HueDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Light::new(device, &LAMP_MANIFEST))
    }

    pub fn plug(device: HueDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Light::new(device, &PLUG_MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for Light {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let status = self.api.get_light_status(&self.id).await?;
        Ok(snapshot(&self.id, &status, self.manifest.schema))
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let command = match *update {
            DeviceUpdate::Lamp(ref u) => lamp_command(u),
            DeviceUpdate::BinarySwitch(ref u) => LightCommand { on: u.on, ..Default::default() },
            DeviceUpdate::Thermostat(_) => {
                return Err(Error::BadRequest(format!("{} is not a thermostat", self.id)));
            },
        };
        if command.is_empty() {
            return Ok(());
        }
        info!("Setting Hue light {} on bridge {}: {:?}", self.id, self.api.id, command);
        self.api.set_light_state(&self.id, &command).await
    }
}

pub fn snapshot(id: &str, entry: &LightEntry, schema: Schema) -> Snapshot {
    let state = match schema {
        Schema::BinarySwitch => DeviceState::BinarySwitch(SwitchState { on: entry.state.on }),
        _ => DeviceState::Lamp(lamp_state(&entry.state)),
    };
    Snapshot {
        info: PlatformInfo {
            control_id: id.to_owned(),
            name: entry.name.clone(),
            manufacturer: entry.manufacturername.clone(),
            model: entry.modelid.clone(),
        },
        state: state,
    }
}

pub fn lamp_state(state: &LightState) -> LampState {
    let rgb = match (state.xy.as_ref(), state.hue, state.sat) {
        (Some(xy), _, _) if xy.len() == 2 => Some(color::xy_to_rgb(xy[0], xy[1], 1.0)),
        (_, Some(hue), Some(sat)) => {
            Some(color::hsv_to_rgb(f64::from(hue) / MAX_HUE * 360.0, f64::from(sat) / MAX_BRI, 1.0))
        },
        _ => None,
    };
    let mode = match state.colormode.as_deref() {
        Some("ct") => Some(ColourMode::Temperature),
        Some("xy") | Some("hs") => Some(ColourMode::Rgb),
        _ => None,
    };
    LampState {
        on: state.on,
        dim: state.bri.map(|bri| (f64::from(bri) / MAX_BRI * 100.0).round().min(100.0) as u8),
        mode: mode,
        rgb: rgb,
        temperature_k: state.ct.map(color::mired_to_kelvin),
    }
}

pub fn lamp_command(update: &LampUpdate) -> LightCommand {
    LightCommand {
        on: update.on,
        bri: update.dim.map(|dim| (f64::from(dim) * MAX_BRI / 100.0).round().max(1.0) as u32),
        xy: update.rgb.map(|rgb| {
            let (x, y) = color::rgb_to_xy(rgb);
            [(x * 10000.0).round() / 10000.0, (y * 10000.0).round() / 10000.0]
        }),
        ct: update.temperature_k.map(color::kelvin_to_mired),
    }
}
