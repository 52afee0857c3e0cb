/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Device, Endpoint };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::http::{ Auth, VendorClient };
use log::{ debug, info };
use reqwest::Url;
use serde_json::{ json, Value };
use std::fmt;
use std::sync::RwLock;

const DEFAULT_ENDPOINTS_URL: &str = "https://graph.api.smartthings.com/api/smartapps/endpoints";

/// The OpenT2T SmartApp installed in one SmartThings account. The app's
/// base URI is looked up once through the endpoints listing.
pub struct SmartThingsApi {
    client: VendorClient,
    endpoint: RwLock<Option<VendorClient>>,
}

impl fmt::Display for SmartThingsApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SmartThings API via {}", self.client.base_url())
    }
}

impl SmartThingsApi {
    pub fn new(endpoints_url: &str, access_token: &str, config: &ConfigStore) -> Result<Self> {
        let client = VendorClient::from_config(
            "smartthings", endpoints_url, Auth::Bearer(access_token.to_owned()), config)?;
        Ok(SmartThingsApi { client: client, endpoint: RwLock::new(None) })
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let token = config.require(CONFIG_SECTION, "access_token")?;
        let url = config.get_or_set_default(CONFIG_SECTION, "endpoints_url", DEFAULT_ENDPOINTS_URL);
        Self::new(&url, &token, config)
    }

    async fn endpoint(&self) -> Result<VendorClient> {
        let cached = self.endpoint.read().unwrap().clone();
        if let Some(client) = cached {
            return Ok(client);
        }
        let endpoints: Vec<Endpoint> = self.client.get("").await?;
        let uri = endpoints.into_iter().next()
            .map(|e| e.uri)
            .ok_or_else(|| Error::NotFound("SmartThings endpoint for this token".to_owned()))?;
        info!("Using SmartThings endpoint {}", uri);
        let client = self.client.with_base_url(&uri);
        *self.endpoint.write().unwrap() = Some(client.clone());
        Ok(client)
    }

    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.endpoint().await?.get("/devices").await?;
        debug!("{} listed {} devices", self, devices.len());
        Ok(devices)
    }

    pub async fn get_device(&self, id: &str) -> Result<Device> {
        self.endpoint().await?.get(&format!("/devices/{}", id)).await
    }

    pub async fn put_device(&self, id: &str, body: &Value) -> Result<()> {
        let _: Value = self.endpoint().await?.put(&format!("/devices/{}", id), body).await?;
        Ok(())
    }

    pub async fn subscribe(&self, id: &str, callback: &str) -> Result<()> {
        let body = json!({ "subscriptionUrl": callback });
        let _: Value = self.endpoint().await?.post(&format!("/subscription/{}", id), &body).await?;
        Ok(())
    }

    pub async fn unsubscribe(&self, id: &str, callback: &str) -> Result<()> {
        let endpoint = self.endpoint().await?;
        let url = Url::parse_with_params(&endpoint.url(&format!("/subscription/{}", id)),
                                         &[("subscriptionUrl", callback)])
            .map_err(|e| Error::BadRequest(format!("bad subscription url: {}", e)))?;
        endpoint.delete(url.as_str()).await
    }
}
