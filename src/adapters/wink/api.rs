/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ collection, Device, Envelope, SubscriptionData };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::http::{ Auth, VendorClient };
use chrono::{ DateTime, Utc };
use log::debug;
use serde_json::{ json, Value };
use std::fmt;

const DEFAULT_API_URL: &str = "https://api.wink.com";

/// The Wink cloud API for one account.
pub struct WinkApi {
    client: VendorClient,
}

impl fmt::Display for WinkApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Wink API at {}", self.client.base_url())
    }
}

impl WinkApi {
    pub fn new(base_url: &str, access_token: &str, config: &ConfigStore) -> Result<Self> {
        let client = VendorClient::from_config("wink", base_url, Auth::Bearer(access_token.to_owned()), config)?;
        Ok(WinkApi { client: client })
    }

    /// Reads `wink.access_token` and `wink.api_url`.
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let token = config.require(CONFIG_SECTION, "access_token")?;
        let base_url = config.get_or_set_default(CONFIG_SECTION, "api_url", DEFAULT_API_URL);
        Self::new(&base_url, &token, config)
    }

    pub async fn get_devices(&self) -> Result<Vec<Device>> {
        let list: Envelope<Vec<Device>> = self.client.get("/users/me/wink_devices").await?;
        debug!("{} listed {} devices", self, list.data.len());
        Ok(list.data)
    }

    pub async fn get_device(&self, object_type: &str, object_id: &str) -> Result<Device> {
        let device: Envelope<Device> =
            self.client.get(&format!("/{}/{}", collection(object_type), object_id)).await?;
        Ok(device.data)
    }

    /// Sends `desired_state`. Wink answers before the device has acted, so
    /// the echoed device is not used.
    pub async fn set_desired_state(&self, object_type: &str, object_id: &str, desired: &Value)
        -> Result<()>
    {
        let path = format!("/{}/{}/desired_state", collection(object_type), object_id);
        let _: Value = self.client.put(&path, &json!({ "desired_state": desired })).await?;
        Ok(())
    }

    /// Registers a PubSubHubbub callback. Returns the subscription id and
    /// its expiry.
    pub async fn subscribe(&self, object_type: &str, object_id: &str, callback: &str, secret: Option<&str>)
        -> Result<(String, Option<DateTime<Utc>>)>
    {
        let path = format!("/{}/{}/subscriptions", collection(object_type), object_id);
        let mut body = json!({ "callback": callback });
        if let Some(secret) = secret {
            body["secret"] = json!(secret);
        }
        let response: Envelope<SubscriptionData> = self.client.post(&path, &body).await?;
        let expires = response.data.expires_at.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
        Ok((response.data.subscription_id, expires))
    }

    pub async fn unsubscribe(&self, subscription_id: &str) -> Result<()> {
        self.client.delete(&format!("/subscriptions/{}", subscription_id)).await
    }
}
