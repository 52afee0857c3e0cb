/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::WinkApi;
use super::device::{ self, WinkTranslator };
use super::structs::Device;
use super::{ binary_switch, lightbulb, sensor_pod, split_control_id, thermostat, WinkDevice };
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::{ Platform, Schema };
use crate::translator::{ DeviceTranslator, HubTranslator, Subscription, TranslatorManifest };
use async_trait::async_trait;
use log::info;
use serde_json::Value;
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-wink-hub",
    vendor: "wink",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<WinkDevice> {
    TranslatorMap::new()
        .with("light_bulb", &lightbulb::MANIFEST, WinkTranslator::lightbulb)
        .with("binary_switch", &binary_switch::MANIFEST, WinkTranslator::binary_switch)
        .with("thermostat", &thermostat::MANIFEST, WinkTranslator::thermostat)
        .with("sensor_pod", &sensor_pod::MANIFEST, WinkTranslator::sensor_pod)
}

pub struct Hub {
    api: Arc<WinkApi>,
    core: HubCore<WinkDevice>,
}

impl Hub {
    pub fn new(api: WinkApi, config: &ConfigStore) -> Self {
        Hub {
            api: Arc::new(api),
            core: HubCore::new("wink", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = WinkApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<WinkDevice>>> {
        let devices = self.api.get_devices().await?;
        Ok(devices.into_iter().map(|d| {
            let device = WinkDevice {
                api: self.api.clone(),
                object_type: d.object_type,
                object_id: d.object_id,
            };
            Discovered {
                control_id: device.control_id(),
                kind: device.object_type.clone(),
                device: device,
            }
        }).collect())
    }

    /// Checks that `control_id` names a listed device, matching both the
    /// object type and the object id.
    async fn listed(&self, control_id: &str) -> Result<(String, String)> {
        let (object_type, object_id) = split_control_id(control_id)?;
        self.api.get_devices().await?
            .into_iter()
            .find(|d| d.object_type == object_type && d.object_id == object_id)
            .map(|d| (d.object_type, d.object_id))
            .ok_or_else(|| Error::NotFound(format!("wink device {}", control_id)))
    }
}

#[async_trait]
impl HubTranslator for Hub {
    fn manifest(&self) -> &'static TranslatorManifest {
        &HUB_MANIFEST
    }

    async fn get_platforms(&self, expand: bool) -> Result<HubResponse> {
        let devices = self.discover().await?;
        self.core.platforms(devices, expand).await
    }

    async fn translator(&self, control_id: &str) -> Result<Arc<dyn DeviceTranslator>> {
        if let Some(translator) = self.core.cached(control_id) {
            return Ok(translator);
        }
        let devices = self.discover().await?;
        self.core.find(devices, control_id)
    }

    async fn subscribe(&self, control_id: &str, callback_url: &str, secret: Option<&str>)
        -> Result<Subscription>
    {
        let (object_type, object_id) = self.listed(control_id).await?;
        let (id, expires_at) = self.api.subscribe(&object_type, &object_id, callback_url, secret).await?;
        info!("Subscribed {} to Wink {} as {}", callback_url, control_id, id);
        Ok(Subscription {
            id: id,
            control_id: control_id.to_owned(),
            expires_at: expires_at,
        })
    }

    async fn unsubscribe(&self, control_id: &str, subscription_id: &str) -> Result<()> {
        info!("Removing subscription {} of Wink device {}", subscription_id, control_id);
        self.api.unsubscribe(subscription_id).await
    }

    /// Wink posts the full device object, optionally wrapped in `data`.
    fn translate_notification(&self, payload: &Value) -> Result<Platform> {
        let body = payload.get("data").unwrap_or(payload);
        let device: Device = serde_json::from_value(body.clone())
            .map_err(|e| Error::BadRequest(format!("not a Wink device: {}", e)))?;
        let entry = self.core.map().resolve(&device.object_type).ok_or_else(|| {
            Error::NotImplemented(format!("wink device type `{}`", device.object_type))
        })?;
        Ok(device::snapshot(entry.manifest, &device)?.platform(entry.manifest, true))
    }
}
