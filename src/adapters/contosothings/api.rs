/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Device, State, SubscriptionReply };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::http::{ Auth, VendorClient };
use chrono::{ DateTime, Utc };
use log::debug;
use serde_json::{ json, Value };
use std::fmt;

const DEFAULT_API_URL: &str = "https://contosothings.azurewebsites.net/api";

pub struct ContosoApi {
    client: VendorClient,
}

impl fmt::Display for ContosoApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ContosoThings API at {}", self.client.base_url())
    }
}

impl ContosoApi {
    pub fn new(base_url: &str, access_token: &str, config: &ConfigStore) -> Result<Self> {
        let client = VendorClient::from_config(
            "contosothings", base_url, Auth::Bearer(access_token.to_owned()), config)?;
        Ok(ContosoApi { client: client })
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let token = config.require(CONFIG_SECTION, "access_token")?;
        let base_url = config.get_or_set_default(CONFIG_SECTION, "api_url", DEFAULT_API_URL);
        Self::new(&base_url, &token, config)
    }

    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.client.get("/devices").await?;
        debug!("{} listed {} devices", self, devices.len());
        Ok(devices)
    }

    pub async fn get_device(&self, id: &str) -> Result<Device> {
        self.client.get(&format!("/devices/{}", id)).await
    }

    pub async fn put_state(&self, id: &str, state: &State) -> Result<()> {
        let _: Value = self.client.put(&format!("/devices/{}/state", id), state).await?;
        Ok(())
    }

    pub async fn subscribe(&self, id: &str, callback: &str, secret: Option<&str>)
        -> Result<(String, Option<DateTime<Utc>>)>
    {
        let mut body = json!({ "callbackUrl": callback });
        if let Some(secret) = secret {
            body["secret"] = json!(secret);
        }
        let reply: SubscriptionReply = self.client.post(&format!("/devices/{}/subscriptions", id), &body).await?;
        Ok((reply.id, reply.expires_at))
    }

    pub async fn unsubscribe(&self, subscription_id: &str) -> Result<()> {
        self.client.delete(&format!("/subscriptions/{}", subscription_id)).await
    }
}
