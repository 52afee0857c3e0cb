/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::WinkApi;
use super::structs::Device;
use super::{ binary_switch, lightbulb, sensor_pod, thermostat, WinkDevice };
use crate::error::{ Error, Result };
use crate::schema::{ DeviceState, DeviceUpdate, PlatformInfo, Schema };
use crate::translator::{ DeviceTranslator, Snapshot, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

/// One Wink device. Wink devices of every type are read and written the
/// same way; only the mapping of `last_reading` and `desired_state`
/// differs, and that is chosen by the manifest's schema.
pub struct WinkTranslator {
    api: Arc<WinkApi>,
    control_id: String,
    object_type: String,
    object_id: String,
    manifest: &'static TranslatorManifest,
}

impl WinkTranslator {
    fn new(device: WinkDevice, manifest: &'static TranslatorManifest) -> Self {
        debug!("Creating {} for {} {}", manifest.name, device.object_type, device.object_id);
        WinkTranslator {
            control_id: device.control_id(),
            api: device.api,
            object_type: device.object_type,
            object_id: device.object_id,
            manifest: manifest,
        }
    }

    pub fn lightbulb(device: WinkDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(WinkTranslator::new(device, &lightbulb::MANIFEST))
    }

    pub fn binary_switch(device: WinkDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(WinkTranslator::new(device, &binary_switch::MANIFEST))
    }

    pub fn thermostat(device: WinkDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(WinkTranslator::new(device, &thermostat::MANIFEST))
    }

    pub fn sensor_pod(device: WinkDevice) -> Arc<dyn DeviceTranslator> {
        Arc::new(WinkTranslator::new(device, &sensor_pod::MANIFEST))
    }
}

#[async_trait]
impl DeviceTranslator for WinkTranslator {
    fn manifest(&self) -> &'static TranslatorManifest {
        self.manifest
    }

    fn control_id(&self) -> &str {
        &self.control_id
    }

    async fn snapshot(&self) -> Result<Snapshot> {
        let device = self.api.get_device(&self.object_type, &self.object_id).await?;
        snapshot(self.manifest, &device)
    }

    async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
        let desired = match *update {
            DeviceUpdate::Lamp(ref u) => lightbulb::desired_state(u),
            DeviceUpdate::BinarySwitch(ref u) => binary_switch::desired_state(u),
            DeviceUpdate::Thermostat(ref u) => {
                let current = self.api.get_device(&self.object_type, &self.object_id).await?;
                thermostat::desired_state(u, &current.last_reading)?
            },
        };
        info!("Setting Wink {} {}: {}", self.object_type, self.object_id, desired);
        self.api.set_desired_state(&self.object_type, &self.object_id, &desired).await
    }
}

/// Translates a Wink device object, as listed, fetched or pushed to a
/// subscription callback.
pub fn snapshot(manifest: &TranslatorManifest, device: &Device) -> Result<Snapshot> {
    let reading = &device.last_reading;
    let unit = thermostat::display_unit(device);
    let state = match manifest.schema {
        Schema::Lamp => DeviceState::Lamp(lightbulb::state(reading)),
        Schema::BinarySwitch => DeviceState::BinarySwitch(binary_switch::state(reading)),
        Schema::Thermostat => DeviceState::Thermostat(thermostat::state(reading, unit)),
        Schema::Multisensor => DeviceState::Multisensor(sensor_pod::state(reading, unit)),
        Schema::Hub => return Err(Error::NotImplemented(format!("{} is not a device", manifest.name))),
    };
    Ok(Snapshot {
        info: PlatformInfo {
            control_id: super::control_id(&device.object_type, &device.object_id),
            name: device.name.clone(),
            manufacturer: device.device_manufacturer.clone().unwrap_or_else(|| "Wink".to_owned()),
            model: device.model_name.clone().unwrap_or_else(|| device.object_type.clone()),
        },
        state: state,
    })
}
