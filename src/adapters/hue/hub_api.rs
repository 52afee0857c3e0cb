/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ self, BridgeConfig, LightCommand, LightEntry };
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::http::{ Auth, VendorClient };
use log::debug;
use serde_json::{ json, Value };
use std::collections::BTreeMap;
use std::fmt;

/// Local REST API of one paired bridge. The username is part of every URL.
#[derive(Debug, Clone)]
pub struct HubApi {
    pub id: String,
    pub ip: String,
    client: VendorClient,
}

impl fmt::Display for HubApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hue Bridge id:{} at {:?}", self.id, self.ip)
    }
}

/// `ip` may also be a full URL, which is how tests point at a mock bridge.
pub fn bridge_url(ip: &str) -> String {
    if ip.starts_with("http://") || ip.starts_with("https://") {
        ip.trim_end_matches('/').to_owned()
    } else {
        format!("http://{}", ip)
    }
}

impl HubApi {
    pub fn new(id: &str, ip: &str, token: &str, config: &ConfigStore) -> Result<Self> {
        let base = format!("{}/api/{}", bridge_url(ip), token);
        Ok(HubApi {
            id: id.to_owned(),
            ip: ip.to_owned(),
            client: VendorClient::from_config("hue", &base, Auth::None, config)?,
        })
    }

    pub async fn get(&self, cmd: &str) -> Result<Value> {
        let value = self.client.get(cmd).await?;
        structs::check_response(value)
    }

    pub async fn put(&self, cmd: &str, data: &Value) -> Result<Value> {
        let value = self.client.put(cmd, data).await?;
        structs::check_response(value)
    }

    pub async fn get_config(&self) -> Result<BridgeConfig> {
        let value = self.get("config").await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_lights(&self) -> Result<BTreeMap<String, LightEntry>> {
        let value = self.get("lights").await?;
        let lights: BTreeMap<String, LightEntry> = serde_json::from_value(value)?;
        debug!("{} reports {} lights", self, lights.len());
        Ok(lights)
    }

    pub async fn get_light_status(&self, id: &str) -> Result<LightEntry> {
        let value = self.get(&format!("lights/{}", id)).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn set_light_state(&self, id: &str, command: &LightCommand) -> Result<()> {
        let url = format!("lights/{}/state", id);
        self.put(&url, &serde_json::to_value(command)?).await?;
        Ok(())
    }
}

/// One pairing attempt. `Ok(None)` while the link button has not been
/// pressed; any other error reply ends pairing.
pub async fn try_pairing(ip: &str, devicetype: &str, config: &ConfigStore) -> Result<Option<String>> {
    let client = VendorClient::from_config("hue", &bridge_url(ip), Auth::None, config)?;
    let response: Value = client.post("api", &json!({ "devicetype": devicetype })).await?;
    if let Some(username) = structs::pairing_username(&response) {
        return Ok(Some(username));
    }
    if structs::link_button_pending(&response) {
        return Ok(None);
    }
    let response = structs::check_response(response)?;
    Err(Error::Vendor { status: 502, message: format!("unexpected pairing reply: {}", response) })
}
