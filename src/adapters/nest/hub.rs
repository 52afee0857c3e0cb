/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::NestApi;
use super::thermostat::{ self, NestThermostat };
use super::NestDevice;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::Schema;
use crate::translator::{ DeviceTranslator, HubTranslator, TranslatorManifest };
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-nest-hub",
    vendor: "nest",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

const THERMOSTAT: &str = "thermostat";

pub fn translator_map() -> TranslatorMap<NestDevice> {
    TranslatorMap::new().with(THERMOSTAT, &thermostat::MANIFEST, NestThermostat::build)
}

pub struct Hub {
    api: Arc<NestApi>,
    core: HubCore<NestDevice>,
}

impl Hub {
    pub fn new(api: NestApi, config: &ConfigStore) -> Self {
        Hub {
            api: Arc::new(api),
            core: HubCore::new("nest", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = NestApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<NestDevice>>> {
        let devices = self.api.get_devices().await?;
        Ok(devices.thermostats.into_iter().map(|(id, _)| Discovered {
            control_id: id.clone(),
            kind: THERMOSTAT.to_owned(),
            device: NestDevice { api: self.api.clone(), device_id: id },
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
