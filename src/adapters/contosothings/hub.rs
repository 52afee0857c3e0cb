/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::api::ContosoApi;
use super::device::{ self, ContosoTranslator, LIGHT_MANIFEST, SWITCH_MANIFEST };
use super::structs::Device;
use super::{ thermostat, ContosoDevice };
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
    name: "opent2t-translator-com-contosothings-hub",
    vendor: "contosothings",
    schema: Schema::Hub,
    resources: &[],
    writable: &[],
};

pub fn translator_map() -> TranslatorMap<ContosoDevice> {
    TranslatorMap::new()
        .with("light", &LIGHT_MANIFEST, ContosoTranslator::light)
        .with("switch", &SWITCH_MANIFEST, ContosoTranslator::switch)
        .with("thermostat", &thermostat::MANIFEST, ContosoTranslator::thermostat)
}

pub struct Hub {
    api: Arc<ContosoApi>,
    core: HubCore<ContosoDevice>,
}

impl Hub {
    pub fn new(api: ContosoApi, config: &ConfigStore) -> Self {
        Hub {
            api: Arc::new(api),
            core: HubCore::new("contosothings", translator_map(), JoinPolicy::from_config(config)),
        }
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let api = ContosoApi::from_config(config)?;
        info!("Using {}", api);
        Ok(Self::new(api, config))
    }

    async fn discover(&self) -> Result<Vec<Discovered<ContosoDevice>>> {
        let devices = self.api.get_devices().await?;
        Ok(devices.into_iter().map(|d| Discovered {
            control_id: d.id.clone(),
            kind: d.kind,
            device: ContosoDevice { api: self.api.clone(), id: d.id },
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

    /// Only supported devices can be subscribed to.
    async fn subscribe(&self, control_id: &str, callback_url: &str, secret: Option<&str>)
        -> Result<Subscription>
    {
        let translator = self.translator(control_id).await?;
        let (id, expires_at) = self.api.subscribe(translator.control_id(), callback_url, secret).await?;
        info!("Subscribed {} to ContosoThings device {} as {}", callback_url, control_id, id);
        Ok(Subscription {
            id: id,
            control_id: control_id.to_owned(),
            expires_at: expires_at,
        })
    }

    async fn unsubscribe(&self, control_id: &str, subscription_id: &str) -> Result<()> {
        info!("Removing subscription {} of ContosoThings device {}", subscription_id, control_id);
        self.api.unsubscribe(subscription_id).await
    }

    /// Notifications carry the full device object.
    fn translate_notification(&self, payload: &Value) -> Result<Platform> {
        let device: Device = serde_json::from_value(payload.clone())
            .map_err(|e| Error::BadRequest(format!("not a ContosoThings device: {}", e)))?;
        let entry = self.core.map().resolve(&device.kind).ok_or_else(|| {
            Error::NotImplemented(format!("contosothings device type `{}`", device.kind))
        })?;
        Ok(device::snapshot(entry.manifest, &device)?.platform(entry.manifest, true))
    }
}
