/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::SmartThingsApi;
use super::structs::{ Attributes, Device };
use super::{ thermostat, SmartThingsDevice };
use crate::color;
use crate::error::{ Error, Result };
use crate::schema::{ ColourMode, DeviceState, DeviceUpdate, LampState, LampUpdate, MultisensorState,
                     PlatformInfo, Schema, SwitchState, Temperature, TemperatureUnit };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use serde_json::{ json, Map, Value };
use std::sync::Arc;

pub static LIGHT_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-smartthings-lightbulb",
    vendor: "smartthings",
    schema: Schema::Lamp,
    resources: &["power", "dim", "colourMode", "colourRGB", "colourTemperature"],
    writable: &["power", "dim", "colourRGB", "colourTemperature"],
};

pub static SWITCH_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-smartthings-binaryswitch",
    vendor: "smartthings",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub static SENSOR_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-smartthings-multisensor",
    vendor: "smartthings",
    schema: Schema::Multisensor,
    resources: &["contact", "motion", "presence", "water", "temperature", "humidity", "battery"],
    writable: &[],
};

pub struct SmartThingsTranslator {
    id: String,
    api: Arc<SmartThingsApi>,
    unit: TemperatureUnit,
    manifest: &'static TranslatorManifest,
}

impl SmartThingsTranslator {
    fn new(device: SmartThingsDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} with ID {}", manifest.name, device.id);
        SmartThingsTranslator {
            id: device.id,
            api: device.api,
            unit: device.unit,
            manifest: manifest,
        }
    }

    pub fn light(device: SmartThingsDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &LIGHT_MANIFEST))
    }

    pub fn switch(device: SmartThingsDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SWITCH_MANIFEST))
    }

    pub fn thermostat(device: SmartThingsDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &thermostat::MANIFEST))
    }

    pub fn sensor(device: SmartThingsDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(Self::new(device, &SENSOR_MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for SmartThingsTranslator {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let device = self.api.get_device(&self.id).await?;
        snapshot(self.manifest, &device, self.unit)
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let body = match *update {
            DeviceUpdate::Lamp(ref u) => light_command(u),
            DeviceUpdate::BinarySwitch(ref u) => match u.on {
                Some(on) => json!({ "switch": on_off(on) }),
                None => json!({}),
            },
            DeviceUpdate::Thermostat(ref u) => {
                let current = self.api.get_device(&self.id).await?;
                thermostat::command(u, &current.attributes, self.unit)?
            },
        };
        info!("Setting SmartThings device {}: {}", self.id, body);
        self.api.put_device(&self.id, &body).await
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

pub fn snapshot(manifest: &TranslatorManifest, device: &Device, unit: TemperatureUnit) -> Result<Snapshot> {
    let attributes = &device.attributes;
    let state = match manifest.schema {
        Schema::Lamp => DeviceState::Lamp(light_state(attributes)),
        Schema::BinarySwitch => DeviceState::BinarySwitch(SwitchState {
            on: attributes.switch.as_deref() == Some("on"),
        }),
        Schema::Thermostat => DeviceState::Thermostat(thermostat::state(attributes, unit)),
        Schema::Multisensor => DeviceState::Multisensor(sensor_state(attributes, unit)),
        Schema::Hub => return Err(Error::NotImplemented(format!("{} is not a device", manifest.name))),
    };
    Ok(Snapshot {
        info: PlatformInfo {
            control_id: device.id.clone(),
            name: device.label.clone().unwrap_or_else(|| device.name.clone()),
            manufacturer: device.manufacturer.clone().unwrap_or_else(|| "SmartThings".to_owned()),
            model: device.model.clone().unwrap_or_else(|| device.device_type.clone()),
        },
        state: state,
    })
}

pub fn light_state(attributes: &Attributes) -> LampState {
    let rgb = match (attributes.hue, attributes.saturation) {
        (Some(hue), Some(sat)) => Some(color::hsv_to_rgb(hue * 3.6, sat / 100.0, 1.0)),
        _ => None,
    };
    let mode = match attributes.color_mode.as_deref() {
        Some("color") | Some("hs") | Some("rgb") => Some(ColourMode::Rgb),
        Some("ct") | Some("colorTemperature") => Some(ColourMode::Temperature),
        _ => None,
    };
    LampState {
        on: attributes.switch.as_deref() == Some("on"),
        dim: attributes.level.map(|l| l.round().max(0.0).min(100.0) as u8),
        mode: mode,
        rgb: rgb,
        temperature_k: attributes.color_temperature,
    }
}

pub fn light_command(update: &LampUpdate) -> Value {
    let mut body = Map::new();
    if let Some(on) = update.on {
        body.insert("switch".to_owned(), json!(on_off(on)));
    }
    if let Some(dim) = update.dim {
        body.insert("level".to_owned(), json!(dim));
    }
    if let Some(rgb) = update.rgb {
        let (hue, sat, _) = color::rgb_to_hsv(rgb);
        body.insert("hue".to_owned(), json!((hue / 3.6).round()));
        body.insert("saturation".to_owned(), json!((sat * 100.0).round()));
    }
    if let Some(kelvin) = update.temperature_k {
        body.insert("colorTemperature".to_owned(), json!(kelvin));
    }
    Value::Object(body)
}

pub fn sensor_state(attributes: &Attributes, unit: TemperatureUnit) -> MultisensorState {
    let flag = |value: &Option<String>, active: &str| value.as_ref().map(|v| v == active);
    MultisensorState {
        contact: flag(&attributes.contact, "open"),
        motion: flag(&attributes.motion, "active"),
        presence: flag(&attributes.presence, "present"),
        water: flag(&attributes.water, "wet"),
        temperature: attributes.temperature.map(|v| Temperature { value: v, unit: unit }),
        humidity: attributes.humidity,
        battery: attributes.battery,
    }
}
