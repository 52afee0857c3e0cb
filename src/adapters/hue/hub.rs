/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::discovery::token_key;
use super::hub_api::HubApi;
use super::light::{ self, Light };
use super::{ HueDevice, CONFIG_SECTION };
use crate::config::ConfigStore;
use crate::error::Result;
use crate::hub::{ Discovered, HubCore, HubResponse, JoinPolicy, TranslatorMap };
use crate::schema::Schema;
use crate::translator::{ DeviceTranslator, HubTranslator, TranslatorManifest };
use async_trait::async_trait;
use log::{ debug, info };
use std::sync::Arc;

pub static HUB_MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-hue-hub",
    vendor: "hue",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<HueDevice> {
    TranslatorMap::new()
        .with("Extended color light", &light::LAMP_MANIFEST, Light::lamp)
        .with("Color light", &light::LAMP_MANIFEST, Light::lamp)
        .with("Color temperature light", &light::LAMP_MANIFEST, Light::lamp)
        .with("Dimmable light", &light::LAMP_MANIFEST, Light::lamp)
        .with("On/Off plug-in unit", &light::PLUG_MANIFEST, Light::plug)
}

pub struct Hub {
    api: Arc<HubApi>,
    core: HubCore<HueDevice>,
}

impl Hub {
    pub fn new(id: &str, ip: &str, token: &str, config: &ConfigStore) -> Result<Self> {
        Ok(Hub {
            api: Arc::new(HubApi::new(id, ip, token, config)?),
            core: HubCore::new("hue", translator_map(), JoinPolicy::from_config(config)),
        })
    }

    /// Opens the bridge named by `hue.bridge_ip` (and optionally
    /// `hue.bridge_id`) using the username stored by pairing.
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let ip = config.require(CONFIG_SECTION, "bridge_ip")?;
        let id = config.get(CONFIG_SECTION, "bridge_id").unwrap_or_else(|| ip.clone());
        let token = config.require(CONFIG_SECTION, &token_key(&id))?;
        info!("Using Philips Hue Bridge ID {} at {}", id, ip);
        Self::new(&id, &ip, &token, config)
    }

    async fn discover(&self) -> Result<Vec<Discovered<HueDevice>>> {
        let lights = self.api.get_lights().await?;
        Ok(lights.into_iter().map(|(light_id, entry)| {
            debug!("Found light {} on hub {}", light_id, self.api.id);
            Discovered {
                control_id: light_id.clone(),
                kind: entry.lighttype,
                device: HueDevice { api: self.api.clone(), light_id: light_id },
            }
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
