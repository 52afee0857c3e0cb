/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Devices, Structure, Thermostat };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::Result;
use crate::http::{ Auth, VendorClient };
use log::debug;
use serde_json::Value;
use std::fmt;

const DEFAULT_API_URL: &str = "https://developer-api.nest.com";

pub struct NestApi {
    client: VendorClient,
}

impl fmt::Display for NestApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Nest API at {}", self.client.base_url())
    }
}

impl NestApi {
    pub fn new(base_url: &str, access_token: &str, config: &ConfigStore) -> Result<Self> {
        let client = VendorClient::from_config("nest", base_url, Auth::Bearer(access_token.to_owned()), config)?;
        Ok(NestApi { client: client })
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let token = config.require(CONFIG_SECTION, "access_token")?;
        let base_url = config.get_or_set_default(CONFIG_SECTION, "api_url", DEFAULT_API_URL);
        Self::new(&base_url, &token, config)
    }

    pub async fn get_devices(&self) -> Result<Devices> {
        let devices: Devices = self.client.get("/devices").await?;
        debug!("{} listed {} thermostats", self, devices.thermostats.len());
        Ok(devices)
    }

    pub async fn get_thermostat(&self, id: &str) -> Result<Thermostat> {
        self.client.get(&format!("/devices/thermostats/{}", id)).await
    }

    pub async fn get_structure(&self, id: &str) -> Result<Structure> {
        self.client.get(&format!("/structures/{}", id)).await
    }

    pub async fn put_thermostat(&self, id: &str, body: &Value) -> Result<()> {
        let _: Value = self.client.put(&format!("/devices/thermostats/{}", id), body).await?;
        Ok(())
    }

    pub async fn put_structure(&self, id: &str, body: &Value) -> Result<()> {
        let _: Value = self.client.put(&format!("/structures/{}", id), body).await?;
        Ok(())
    }
}
