/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `light`, `switch` or `thermostat`.
    #[serde(rename = "type")]
    pub kind: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub state: State,
}

/// Device state. Writes send the same object with only the fields to
/// change.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// `on` or `off`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    /// 0 – 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// `rgb` or `ct`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
    /// Kelvin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temperature_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_temperature_low: Option<f64>,
    /// `C` or `F`; temperatures are read and written in this unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_units: Option<String>,
    /// `auto`, `heat`, `cool`, `eco` or `off`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hvac_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_modes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub away: Option<bool>,
    /// `on` or `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

impl State {
    pub fn is_empty(&self) -> bool {
        *self == State::default()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionReply {
    pub id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_state_serializes_only_set_fields() {
        let state = State { power: Some("on".to_owned()), brightness: Some(20), ..Default::default() };
        assert_eq!(serde_json::to_value(&state).unwrap(), json!({ "power": "on", "brightness": 20 }));
        assert!(State::default().is_empty());
    }

    #[test]
    fn subscription_expiry_is_rfc3339() {
        let reply: SubscriptionReply = serde_json::from_value(json!({
            "id": "s-1", "expiresAt": "2026-10-20T08:00:00Z"
        })).unwrap();
        assert_eq!(reply.expires_at.unwrap().timestamp(), 1792483200);
    }
}
