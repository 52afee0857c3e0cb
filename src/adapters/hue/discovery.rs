/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::hub_api::{ self, HubApi };
use super::structs::NupnpEntry;
use super::CONFIG_SECTION;
use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::http::{ Auth, VendorClient };
use log::{ debug, info, warn };
use std::time::Duration;

const DEFAULT_NUPNP_URL: &str = "https://discovery.meethue.com";
const DEVICE_TYPE: &str = "t2t_translators#hub";

/// Bridges registered with the vendor's nUPnP service for this network.
/// Failures are logged and yield an empty list.
pub async fn nupnp_query(config: &ConfigStore) -> Vec<NupnpEntry> {
    let server_url = config.get_or_set_default(CONFIG_SECTION, "nupnp_url", DEFAULT_NUPNP_URL);
    debug!("Querying NUPnP server at {}", server_url);
    let client = match VendorClient::from_config("hue", &server_url, Auth::None, config) {
        Ok(client) => client,
        Err(e) => {
            warn!("Unable to create NUPnP client: {}", e);
            return Vec::new();
        }
    };
    let nupnp_list = match client.get::<serde_json::Value>("").await {
        Ok(value) => parse_nupnp_response(value),
        Err(e) => {
            warn!("NUPnP query failed: {}", e);
            Vec::new()
        }
    };
    debug!("Parsed NUPnP response: {:?}", nupnp_list);
    nupnp_list
}

fn parse_nupnp_response(content: serde_json::Value) -> Vec<NupnpEntry> {
    match serde_json::from_value(content) {
        Ok(value) => value,
        Err(error) => {
            warn!("Unable to parse NUPnP response: {}", error);
            Vec::new()
        }
    }
}

/// Config key holding the username for a bridge.
pub fn token_key(bridge_id: &str) -> String {
    format!("token_{}", bridge_id)
}

/// Waits for the link button to be pressed, then stores the username the
/// bridge hands out.
pub async fn pair(bridge_id: &str, ip: &str, config: &ConfigStore, attempts: u32, interval: Duration)
    -> Result<String>
{
    info!("Push pairing button on Philips Hue Bridge ID {}", bridge_id);
    for attempt in 1..=attempts {
        if let Some(username) = hub_api::try_pairing(ip, DEVICE_TYPE, config).await? {
            config.set(CONFIG_SECTION, &token_key(bridge_id), &username)?;
            info!("Paired with Philips Hue Bridge ID {}", bridge_id);

            let api = HubApi::new(bridge_id, ip, &username, config)?;
            match api.get_config().await {
                Ok(hs) => info!(
                    "Connected to Philips Hue bridge model {}, ID {}, software version {}, IP address {}",
                    hs.modelid, hs.bridgeid, hs.swversion, hs.ipaddress),
                Err(e) => warn!("Unable to read settings of {}: {}", api, e),
            }
            return Ok(username);
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }
    warn!("Pairing timeout with Philips Hue Bridge ID {}", bridge_id);
    Err(Error::Timeout(format!("pairing with Philips Hue Bridge {}", bridge_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{ method, path };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    #[test]
    fn garbage_yields_no_bridges() {
        assert!(parse_nupnp_response(json!([])).is_empty());
        assert!(parse_nupnp_response(json!({ "id": 1 })).is_empty());
        assert!(parse_nupnp_response(json!("<html>")).is_empty());
    }

    #[tokio::test]
    async fn queries_configured_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "001788fffe25681a", "internalipaddress": "192.168.2.4" }
            ])))
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        config.set(CONFIG_SECTION, "nupnp_url", &server.uri()).unwrap();
        let bridges = nupnp_query(&config).await;
        assert_eq!(bridges, vec![NupnpEntry {
            id: "001788fffe25681a".to_owned(),
            internalipaddress: "192.168.2.4".to_owned(),
        }]);
    }

    #[tokio::test]
    async fn pairing_stores_username() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "success": { "username": "newuser" } }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/newuser/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Philips hue", "modelid": "BSB002", "bridgeid": "B1",
                "swversion": "1941132080", "ipaddress": "192.168.2.4"
            })))
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        let username = pair("B1", &server.uri(), &config, 3, Duration::from_millis(1)).await.unwrap();
        assert_eq!(username, "newuser");
        assert_eq!(config.get(CONFIG_SECTION, "token_B1").as_deref(), Some("newuser"));
    }

    #[tokio::test]
    async fn pairing_times_out_without_button() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "error": { "type": 101, "address": "", "description": "link button not pressed" } }
            ])))
            .expect(2)
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        let err = pair("B2", &server.uri(), &config, 2, Duration::from_millis(1)).await.unwrap_err();
        assert_eq!(err.status(), 504);
        assert!(config.get(CONFIG_SECTION, "token_B2").is_none());
    }

    #[tokio::test]
    async fn no_wait_after_the_last_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "error": { "type": 101, "address": "", "description": "link button not pressed" } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        let uri = server.uri();
        let paired = pair("B3", &uri, &config, 1, Duration::from_secs(60));
        let err = tokio::time::timeout(Duration::from_secs(10), paired).await
            .expect("pairing slept after its last attempt")
            .unwrap_err();
        assert_eq!(err.status(), 504);
    }

    #[tokio::test]
    async fn other_bridge_errors_end_pairing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "error": { "type": 1, "address": "/", "description": "unauthorized user" } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        let err = pair("B4", &server.uri(), &config, 5, Duration::from_millis(1)).await.unwrap_err();
        assert_eq!(err.status(), 401);
    }

    #[tokio::test]
    async fn invalid_pairing_request_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "error": { "type": 7, "address": "/devicetype", "description": "invalid value" } }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConfigStore::in_memory();
        let err = pair("B5", &server.uri(), &config, 5, Duration::from_millis(1)).await.unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
