/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::{ Command, CommandRequest, DeviceEntry, DeviceList, StatusResponse,
                      STATUS_FAILED, STATUS_SUCCEEDED };
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::http::{ Auth, VendorClient };
use log::{ debug, warn };
use std::fmt;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://connect.insteon.com/api/v2";
const DEFAULT_POLL_ATTEMPTS: u32 = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Insteon commands are queued; their outcome is polled for.
pub struct InsteonApi {
    client: VendorClient,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl fmt::Display for InsteonApi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Insteon API at {}", self.client.base_url())
    }
}

impl InsteonApi {
    pub fn new(base_url: &str, api_key: &str, access_token: &str, config: &ConfigStore) -> Result<Self> {
        let auth = Auth::Headers(vec![
            ("Authentication".to_owned(), format!("APIKey {}", api_key)),
            ("Authorization".to_owned(), format!("Bearer {}", access_token)),
        ]);
        Ok(InsteonApi {
            client: VendorClient::from_config("insteon", base_url, auth, config)?,
            // At least one poll, or no command could ever finish.
            poll_attempts: config.get_parsed(CONFIG_SECTION, "poll_attempts", DEFAULT_POLL_ATTEMPTS).max(1),
            poll_interval: Duration::from_millis(
                config.get_parsed(CONFIG_SECTION, "poll_interval_ms", DEFAULT_POLL_INTERVAL_MS)),
        })
    }

    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let key = config.require(CONFIG_SECTION, "api_key")?;
        let token = config.require(CONFIG_SECTION, "access_token")?;
        let base_url = config.get_or_set_default(CONFIG_SECTION, "api_url", DEFAULT_API_URL);
        Self::new(&base_url, &key, &token, config)
    }

    pub async fn get_devices(&self) -> Result<Vec<DeviceEntry>> {
        let list: DeviceList = self.client.get("/devices?properties=all").await?;
        debug!("{} listed {} devices", self, list.devices.len());
        Ok(list.devices)
    }

    /// Queues `request` and waits for it to finish.
    pub async fn run(&self, request: &CommandRequest) -> Result<StatusResponse> {
        let queued: Command = self.client.post("/commands", request).await?;
        debug!("Insteon command {} queued as {}", request.command, queued.id);
        self.wait(queued.id).await
    }

    async fn wait(&self, id: u64) -> Result<StatusResponse> {
        for _ in 0..self.poll_attempts {
            let command: Command = self.client.get(&format!("/commands/{}", id)).await?;
            match command.status.as_str() {
                STATUS_SUCCEEDED => return Ok(command.response),
                STATUS_FAILED => {
                    return Err(Error::Vendor {
                        status: 502,
                        message: format!("Insteon command {} failed", id),
                    });
                },
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
        warn!("Insteon command {} did not finish after {} polls", id, self.poll_attempts);
        Err(Error::Timeout(format!("Insteon command {}", id)))
    }
}
