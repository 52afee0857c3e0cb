/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Device, SData };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::http::{ Auth, VendorClient };
use crate::schema::TemperatureUnit;
use log::debug;
use reqwest::Url;
use serde_json::Value;
use std::fmt;

/// One UPnP action call: `serviceId`, `action` and its single argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub service: &'static str,
    pub action: &'static str,
    pub argument: &'static str,
    pub value: String,
}

/// A Vera controller, either on the LAN (`http://<ip>:3480`) or through
/// the remote access relay, which wants the session token in `MMSSession`.
pub struct VeraApi {
    client: VendorClient,
}

impl fmt::Display for VeraApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Vera controller at {}", self.client.base_url())
    }
}

impl VeraApi {
    pub fn new(base_url: &str, session: Option<&str>, config: &ConfigStore) -> Result<Self> {
        let auth = match session {
            Some(token) => Auth::Headers(vec![("MMSSession".to_owned(), token.to_owned())]),
            None => Auth::None,
        };
        Ok(VeraApi { client: VendorClient::from_config("vera", base_url, auth, config)? })
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let base_url = config.require(CONFIG_SECTION, "api_url")?;
        let session = config.get(CONFIG_SECTION, "session_token");
        Self::new(&base_url, session.as_deref(), config)
    }

    fn request_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        Url::parse_with_params(&self.client.url("data_request"), params)
            .map_err(|e| Error::Config(format!("bad Vera url {}: {}", self.client.base_url(), e)))
    }

    /// Every device, and the controller's temperature scale.
    pub async fn sdata(&self) -> Result<(Vec<Device>, TemperatureUnit)> {
        let url = self.request_url(&[("id", "sdata"), ("output_format", "json")])?;
        let sdata: SData = self.client.get(url.as_str()).await?;
        debug!("{} listed {} devices", self, sdata.devices.len());
        let unit = sdata.temperature.as_deref()
            .and_then(TemperatureUnit::parse)
            .unwrap_or(TemperatureUnit::F);
        Ok((sdata.devices, unit))
    }

    pub async fn get_device(&self, id: u32) -> Result<(Device, TemperatureUnit)> {
        let (devices, unit) = self.sdata().await?;
        let device = devices.into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| Error::NotFound(format!("vera device {}", id)))?;
        Ok((device, unit))
    }

    /// Runs one action. Failures come back as plain text such as
    /// `ERROR: Invalid Service`, which does not parse and so is a 502.
    pub async fn action(&self, id: u32, action: &Action) -> Result<()> {
        let device = id.to_string();
        let url = self.request_url(&[
            ("id", "action"),
            ("output_format", "json"),
            ("DeviceNum", &device),
            ("serviceId", action.service),
            ("action", action.action),
            (action.argument, &action.value),
        ])?;
        let reply: Value = self.client.get(url.as_str()).await?;
        debug!("Vera device {} {}: {}", id, action.action, reply);
        Ok(())
    }
}
