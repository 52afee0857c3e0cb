/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::InsteonApi;
use super::device::{ InsteonTranslator, LIGHT_MANIFEST, SWITCH_MANIFEST, THERMOSTAT_MANIFEST };
use super::structs::{ kind, KIND_DIMMABLE, KIND_SWITCHED, KIND_THERMOSTAT };
use super::InsteonDevice;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::Schema;
use crate::translator::{ DeviceTranslator, HubTranslator, TranslatorManifest };
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-insteon-hub",
    vendor: "insteon",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<InsteonDevice> {
    TranslatorMap::new()
        .with(KIND_DIMMABLE, &LIGHT_MANIFEST, InsteonTranslator::light)
        .with(KIND_SWITCHED, &SWITCH_MANIFEST, InsteonTranslator::switch)
        .with(KIND_THERMOSTAT, &THERMOSTAT_MANIFEST, InsteonTranslator::thermostat)
}

pub struct Hub {
    api: Arc<InsteonApi>,
    core: HubCore<InsteonDevice>,
}

impl Hub {
    pub fn new(api: InsteonApi, config: &ConfigStore) -> Self {
        Hub {
            api: Arc::new(api),
            core: HubCore::new("insteon", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = InsteonApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<InsteonDevice>>> {
        let devices = self.api.get_devices().await?;
        Ok(devices.into_iter().map(|entry| Discovered {
            control_id: entry.device_id.to_string(),
            kind: kind(entry.dev_cat),
            device: InsteonDevice { api: self.api.clone(), entry: entry },
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
