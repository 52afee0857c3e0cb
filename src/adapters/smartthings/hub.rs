/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::SmartThingsApi;
use super::device::{ self, SmartThingsTranslator, LIGHT_MANIFEST, SENSOR_MANIFEST, SWITCH_MANIFEST };
use super::structs::Device;
use super::{ thermostat, SmartThingsDevice, CONFIG_SECTION };
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::{ Platform, Schema, TemperatureUnit };
use crate::translator::{ DeviceTranslator, HubTranslator, Subscription, TranslatorManifest };
use async_trait::async_trait;
use log::info;
use serde_json::Value;
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-smartthings-hub",
    vendor: "smartthings",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<SmartThingsDevice> {
    TranslatorMap::new()
        .with("light", &LIGHT_MANIFEST, SmartThingsTranslator::light)
        .with("switch", &SWITCH_MANIFEST, SmartThingsTranslator::switch)
        .with("thermostat", &thermostat::MANIFEST, SmartThingsTranslator::thermostat)
        .with("contactSensor", &SENSOR_MANIFEST, SmartThingsTranslator::sensor)
        .with("motionSensor", &SENSOR_MANIFEST, SmartThingsTranslator::sensor)
        .with("presenceSensor", &SENSOR_MANIFEST, SmartThingsTranslator::sensor)
        .with("waterSensor", &SENSOR_MANIFEST, SmartThingsTranslator::sensor)
}

pub struct Hub {
    api: Arc<SmartThingsApi>,
    unit: TemperatureUnit,
    core: HubCore<SmartThingsDevice>,
}

impl Hub {
    pub fn new(api: SmartThingsApi, config: &ConfigStore) -> Self {
        let scale = config.get_or_set_default(CONFIG_SECTION, "temperature_scale", "F");
        Hub {
            api: Arc::new(api),
            unit: TemperatureUnit::parse(&scale).unwrap_or(TemperatureUnit::F),
            core: HubCore::new("smartthings", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = SmartThingsApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<SmartThingsDevice>>> {
        let devices = self.api.get_devices().await?;
        Ok(devices.into_iter().map(|d| Discovered {
            control_id: d.id.clone(),
            kind: d.device_type,
            device: SmartThingsDevice { api: self.api.clone(), id: d.id, unit: self.unit },
        }).collect())
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

    /// SmartThings keys subscriptions by device and callback, so the
    /// callback URL doubles as the subscription id. They do not expire.
    async fn subscribe(&self, control_id: &str, callback_url: &str, _secret: Option<&str>)
        -> Result<Subscription>
    {
        self.api.subscribe(control_id, callback_url).await?;
        info!("Subscribed {} to SmartThings device {}", callback_url, control_id);
        Ok(Subscription {
            id: callback_url.to_owned(),
            control_id: control_id.to_owned(),
            expires_at: None,
        })
    }

    async fn unsubscribe(&self, control_id: &str, subscription_id: &str) -> Result<()> {
        info!("Removing subscription {} of SmartThings device {}", subscription_id, control_id);
        self.api.unsubscribe(control_id, subscription_id).await
    }

    fn translate_notification(&self, payload: &Value) -> Result<Platform> {
        let device: Device = serde_json::from_value(payload.clone())
            .map_err(|e| Error::BadRequest(format!("not a SmartThings device: {}", e)))?;
        let entry = self.core.map().resolve(&device.device_type).ok_or_else(|| {
            Error::NotImplemented(format!("smartthings device type `{}`", device.device_type))
        })?;
        Ok(device::snapshot(entry.manifest, &device, self.unit)?.platform(entry.manifest, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hub() -> Hub {
        let config = ConfigStore::in_memory();
        config.set(CONFIG_SECTION, "temperature_scale", "C").unwrap();
        Hub::new(SmartThingsApi::new("http://127.0.0.1:9", "token", &config).unwrap(), &config)
    }

    #[test]
    fn sensor_notification() {
        let platform = hub().translate_notification(&json!({
            "id": "d1",
            "name": "Back door",
            "deviceType": "contactSensor",
            "attributes": { "contact": "open", "temperature": 19.5 }
        })).unwrap();
        assert_eq!(platform.opent2t.translator, "opent2t-translator-com-smartthings-multisensor");
        assert_eq!(platform.find_resource("contact").unwrap().value("value"), Some(&json!(true)));
        assert_eq!(platform.find_resource("temperature").unwrap().value("units"), Some(&json!("C")));
    }

    #[test]
    fn map_covers_sensor_types() {
        let map = translator_map();
        for kind in &["contactSensor", "MOTIONSENSOR", "presenceSensor", "waterSensor"] {
            assert_eq!(map.resolve(kind).unwrap().manifest.name, SENSOR_MANIFEST.name);
        }
        assert!(map.resolve("camera").is_none());
    }
}
