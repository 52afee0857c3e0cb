/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::error::{ Error, Result };
use serde::{ Deserialize, Serialize };
use serde_json::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NupnpEntry {
    pub id: String,
    pub internalipaddress: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct BridgeConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub modelid: String,
    #[serde(default)]
    pub bridgeid: String,
    #[serde(default)]
    pub swversion: String,
    #[serde(default)]
    pub ipaddress: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LightEntry {
    pub name: String,
    #[serde(default)]
    pub modelid: String,
    #[serde(default)]
    pub uniqueid: String,
    #[serde(rename = "type")]
    pub lighttype: String,
    #[serde(default)]
    pub manufacturername: String,
    #[serde(default)]
    pub state: LightState,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LightState {
    #[serde(default)]
    pub on: bool,
    pub bri: Option<u32>,
    pub hue: Option<u32>,
    pub sat: Option<u32>,
    pub xy: Option<Vec<f64>>,
    pub ct: Option<u32>,
    pub colormode: Option<String>,
    #[serde(default)]
    pub reachable: bool,
}

/// Body of `PUT lights/<id>/state`.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct LightCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bri: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xy: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<u32>,
}

impl LightCommand {
    pub fn is_empty(&self) -> bool {
        *self == LightCommand::default()
    }
}

#[derive(Deserialize, Debug)]
pub struct HueError {
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

/// Error type of `POST /api` until the link button is pressed.
pub const LINK_BUTTON_NOT_PRESSED: u32 = 101;

impl HueError {
    pub fn into_error(self) -> Error {
        match self.kind {
            // 1: unauthorized user
            1 | LINK_BUTTON_NOT_PRESSED => Error::Unauthorized(self.description),
            3 => Error::NotFound(format!("{} ({})", self.description, self.address)),
            _ => Error::BadRequest(format!("hue error {}: {}", self.kind, self.description)),
        }
    }
}

/// The bridge answers errors with HTTP 200 and a list such as
/// `[{"error":{"type":1,"address":"/","description":"unauthorized user"}}]`.
pub fn check_response(value: Value) -> Result<Value> {
    if let Some(entries) = value.as_array() {
        for entry in entries {
            if let Some(err) = entry.get("error") {
                let err: HueError = serde_json::from_value(err.clone())?;
                return Err(err.into_error());
            }
        }
    }
    Ok(value)
}

/// Username handed out by `POST /api`.
pub fn pairing_username(value: &Value) -> Option<String> {
    value.as_array()?
        .iter()
        .filter_map(|entry| entry.get("success"))
        .filter_map(|success| success.get("username"))
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .next()
}

/// Whether a pairing reply only says the link button has not been pressed.
pub fn link_button_pending(value: &Value) -> bool {
    value.as_array()
        .and_then(|entries| entries.iter().find_map(|entry| entry.get("error")))
        .and_then(|err| err.get("type"))
        .and_then(Value::as_u64)
        == Some(LINK_BUTTON_NOT_PRESSED as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_error_101_means_keep_waiting() {
        let pending = json!([{ "error": { "type": 101, "address": "", "description": "link button not pressed" } }]);
        let unauthorized = json!([{ "error": { "type": 1, "address": "/", "description": "unauthorized user" } }]);
        assert!(link_button_pending(&pending));
        assert!(!link_button_pending(&unauthorized));
        assert!(!link_button_pending(&json!([{ "success": { "username": "u" } }])));
        assert!(!link_button_pending(&json!({})));
    }

    #[test]
    fn light_entry_tolerates_missing_fields() {
        let entry: LightEntry = serde_json::from_value(json!({
            "name": "Hall", "type": "Dimmable light",
            "state": { "on": true, "bri": 127, "reachable": true }
        })).unwrap();
        assert_eq!(entry.state.bri, Some(127));
        assert_eq!(entry.state.xy, None);
        assert_eq!(entry.modelid, "");
    }

    #[test]
    fn errors_in_success_responses() {
        let unauthorized = json!([{ "error": { "type": 1, "address": "/", "description": "unauthorized user" } }]);
        assert_eq!(check_response(unauthorized).unwrap_err().status(), 401);

        let missing = json!([{ "error": { "type": 3, "address": "/lights/9", "description": "resource not available" } }]);
        assert_eq!(check_response(missing).unwrap_err().status(), 404);

        let ok = json!([{ "success": { "/lights/1/state/on": true } }]);
        assert!(check_response(ok).is_ok());
    }

    #[test]
    fn pairing_response() {
        let success = json!([{ "success": { "username": "83b7780291a6ceffbe0bd049104df" } }]);
        assert_eq!(pairing_username(&success).as_deref(), Some("83b7780291a6ceffbe0bd049104df"));
        let pending = json!([{ "error": { "type": 101, "address": "", "description": "link button not pressed" } }]);
        assert_eq!(pairing_username(&pending), None);
    }

    #[test]
    fn nupnp_list() {
        // "[{\"id\":\"001788fffe243755\",\"internalipaddress\":\"192.168.5.129\"}]"
        let list: Vec<NupnpEntry> =
            serde_json::from_str(r#"[{"id":"001788fffe243755","internalipaddress":"192.168.5.129"}]"#).unwrap();
        assert_eq!(list[0].internalipaddress, "192.168.5.129");
    }

    #[test]
    fn empty_command_serializes_to_nothing() {
        assert!(LightCommand::default().is_empty());
        let command = LightCommand { on: Some(true), ct: Some(370), ..Default::default() };
        assert_eq!(serde_json::to_value(&command).unwrap(), json!({ "on": true, "ct": 370 }));
    }
}
