/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::VeraApi;
use super::device::{ VeraTranslator, LIGHT_MANIFEST, SENSOR_MANIFEST, SWITCH_MANIFEST };
use super::{ structs, thermostat, VeraDevice };
use crate::config::ConfigStore;
use crate::error::Result;
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::Schema;
use crate::translator::{ DeviceTranslator, HubTranslator, TranslatorManifest };
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-vera-hub",
    vendor: "vera",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<VeraDevice> {
    TranslatorMap::new()
        .with("dimmable_light", &LIGHT_MANIFEST, VeraTranslator::light)
        .with("switch", &SWITCH_MANIFEST, VeraTranslator::switch)
        .with("thermostat", &thermostat::MANIFEST, VeraTranslator::thermostat)
        .with("door_sensor", &SENSOR_MANIFEST, VeraTranslator::sensor)
        .with("leak_sensor", &SENSOR_MANIFEST, VeraTranslator::sensor)
        .with("motion_sensor", &SENSOR_MANIFEST, VeraTranslator::sensor)
        .with("humidity_sensor", &SENSOR_MANIFEST, VeraTranslator::sensor)
        .with("temperature_sensor", &SENSOR_MANIFEST, VeraTranslator::sensor)
}

/// The controller has no push notifications, so subscriptions keep the
/// default `NotImplemented`.
pub struct Hub {
    api: Arc<VeraApi>,
    core: HubCore<VeraDevice>,
}

impl Hub {
    pub fn new(api: VeraApi, config: &ConfigStore) -> Self {
        Hub {
            api: Arc::new(api),
            core: HubCore::new("vera", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = VeraApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<VeraDevice>>> {
        let (devices, _) = self.api.sdata().await?;
        Ok(devices.into_iter().map(|d| Discovered {
            control_id: d.id.to_string(),
            kind: structs::kind(d.category, d.subcategory),
            device: VeraDevice { api: self.api.clone(), id: d.id },
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensors_share_one_translator() {
        let map = translator_map();
        for kind in &["door_sensor", "leak_sensor", "motion_sensor", "humidity_sensor", "temperature_sensor"] {
            assert_eq!(map.resolve(kind).unwrap().manifest.name, SENSOR_MANIFEST.name);
        }
        assert!(map.resolve(&structs::kind(4, 4)).is_none());
    }

    #[tokio::test]
    async fn subscriptions_are_not_implemented() {
        let config = ConfigStore::in_memory();
        let hub = Hub::new(VeraApi::new("http://127.0.0.1:9", None, &config).unwrap(), &config);
        assert_eq!(hub.subscribe("1", "https://example.com/cb", None).await.unwrap_err().status(), 501);
    }
}
