/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The contract every translator fulfils.
//!
//! A device translator only has to know how to read its device into a
//! `Snapshot` and how to push a `DeviceUpdate` to the vendor; `get`, `post`
//! and platform rendering are shared. A hub translator discovers devices
//! and hands out device translators by control id.

use crate::error::{ Error, Result };
use crate::hub::HubResponse;
use crate::schema::{ DeviceState, DeviceUpdate, Platform, PlatformInfo, Resource, Schema };
use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Static description of a translator, checked by `verify`.
#[derive(Debug)]
pub struct TranslatorManifest {
    pub name: &'static str,
    pub vendor: &'static str,
    pub schema: Schema,
    /// Resources the translator can report.
    pub resources: &'static [&'static str],
    /// Resources the translator accepts updates for.
    pub writable: &'static [&'static str],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub info: PlatformInfo,
    pub state: DeviceState,
}

impl Snapshot {
    pub fn platform(&self, manifest: &TranslatorManifest, expand: bool) -> Platform {
        Platform::build(&self.info, manifest.name, &self.state, expand)
    }
}

#[async_trait]
pub trait DeviceTranslator: Send + Sync {
    fn manifest(&self) -> &'static TranslatorManifest;

    fn control_id(&self) -> &str;

    /// Reads the device from the vendor.
    async fn snapshot(&self) -> Result<Snapshot>;

    /// Sends an update to the vendor.
    async fn apply(&self, update: &DeviceUpdate) -> Result<()>;

    async fn get(&self, expand: bool) -> Result<Platform> {
        let snapshot = self.snapshot().await?;
        Ok(snapshot.platform(self.manifest(), expand))
    }

    /// Updates a single resource and returns its value as read back.
    async fn post_resource(&self, resource_id: &str, payload: &Value) -> Result<Resource> {
        let update = DeviceUpdate::from_resource(self.manifest().schema, resource_id, payload)?;
        self.apply(&update).await?;
        let snapshot = self.snapshot().await?;
        snapshot.state.resource(resource_id, true)
    }

    /// Applies every writable resource of `platform` in one vendor call.
    async fn post_platform(&self, platform: &Platform) -> Result<Platform> {
        let update = DeviceUpdate::from_platform(self.manifest().schema, platform)?;
        if !update.is_empty() {
            self.apply(&update).await?;
        }
        self.get(true).await
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Subscription {
    pub id: String,
    #[serde(rename = "controlId")]
    pub control_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait HubTranslator: Send + Sync {
    fn manifest(&self) -> &'static TranslatorManifest;

    /// Lists the account's devices and reads each supported one.
    async fn get_platforms(&self, expand: bool) -> Result<HubResponse>;

    /// Device translator for `control_id`, created on first use.
    async fn translator(&self, control_id: &str) -> Result<Arc<dyn DeviceTranslator>>;

    async fn get_platform(&self, control_id: &str, expand: bool) -> Result<Platform> {
        self.translator(control_id).await?.get(expand).await
    }

    async fn post_platform(&self, control_id: &str, platform: &Platform) -> Result<Platform> {
        if platform.opent2t.control_id != control_id {
            return Err(Error::BadRequest(format!(
                "platform is for {}, not {}", platform.opent2t.control_id, control_id)));
        }
        self.translator(control_id).await?.post_platform(platform).await
    }

    async fn post_resource(&self, control_id: &str, resource_id: &str, payload: &Value)
        -> Result<Resource>
    {
        self.translator(control_id).await?.post_resource(resource_id, payload).await
    }

    async fn subscribe(&self, _control_id: &str, _callback_url: &str, _secret: Option<&str>)
        -> Result<Subscription>
    {
        Err(Error::NotImplemented(format!("{} subscriptions", self.manifest().vendor)))
    }

    async fn unsubscribe(&self, _control_id: &str, _subscription_id: &str) -> Result<()> {
        Err(Error::NotImplemented(format!("{} subscriptions", self.manifest().vendor)))
    }

    /// Turns a pushed vendor notification into a platform without
    /// contacting the vendor.
    fn translate_notification(&self, _payload: &Value) -> Result<Platform> {
        Err(Error::NotImplemented(format!("{} notifications", self.manifest().vendor)))
    }
}

/// Answers a PubSubHubbub verification request: the challenge must be
/// echoed back for (un)subscribe intents.
pub fn verify_subscription(query: &HashMap<String, String>) -> Result<String> {
    match query.get("hub.mode").map(String::as_str) {
        Some("subscribe") | Some("unsubscribe") => {},
        Some(other) => return Err(Error::BadRequest(format!("unexpected hub.mode {}", other))),
        None => return Err(Error::BadRequest("missing hub.mode".to_owned())),
    }
    query.get("hub.challenge")
        .filter(|c| !c.is_empty())
        .cloned()
        .ok_or_else(|| Error::BadRequest("missing hub.challenge".to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ SwitchState, SwitchUpdate };
    use serde_json::json;
    use std::sync::Mutex;

    static MANIFEST: TranslatorManifest = TranslatorManifest {
        name: "opent2t-translator-com-test-binaryswitch",
        vendor: "test",
        schema: Schema::BinarySwitch,
        resources: &["power"],
        writable: &["power"],
    };

    struct FakeSwitch {
        on: Mutex<bool>,
        applied: Mutex<Vec<DeviceUpdate>>,
    }

    #[async_trait]
    impl DeviceTranslator for FakeSwitch {
        fn manifest(&self) -> &'static TranslatorManifest {
            &MANIFEST
        }

        fn control_id(&self) -> &str {
            "sw1"
        }

        async fn snapshot(&self) -> Result<Snapshot> {
            Ok(Snapshot {
                info: PlatformInfo { control_id: "sw1".to_owned(), ..Default::default() },
                state: DeviceState::BinarySwitch(SwitchState { on: *self.on.lock().unwrap() }),
            })
        }

        async fn apply(&self, update: &DeviceUpdate) -> Result<()> {
            if let DeviceUpdate::BinarySwitch(SwitchUpdate { on: Some(on) }) = *update {
                *self.on.lock().unwrap() = on;
            }
            self.applied.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    fn switch() -> FakeSwitch {
        FakeSwitch { on: Mutex::new(false), applied: Mutex::new(Vec::new()) }
    }

    #[tokio::test]
    async fn post_resource_reads_back() {
        let sw = switch();
        let resource = sw.post_resource("power", &json!({ "value": true })).await.unwrap();
        assert_eq!(resource.value("value"), Some(&json!(true)));
        assert_eq!(sw.applied.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn post_platform_skips_vendor_call_without_changes() {
        let sw = switch();
        let mut platform = sw.get(false).await.unwrap();
        let posted = sw.post_platform(&platform).await.unwrap();
        assert_eq!(posted.find_resource("power").unwrap().value("value"), Some(&json!(false)));
        assert!(sw.applied.lock().unwrap().is_empty());

        platform.entities[0].resources[0].values.insert("value".to_owned(), json!(true));
        sw.post_platform(&platform).await.unwrap();
        assert_eq!(sw.applied.lock().unwrap().len(), 1);
    }

    #[test]
    fn verification_echoes_challenge() {
        let mut query = HashMap::new();
        query.insert("hub.mode".to_owned(), "subscribe".to_owned());
        query.insert("hub.challenge".to_owned(), "abc123".to_owned());
        assert_eq!(verify_subscription(&query).unwrap(), "abc123");

        query.insert("hub.mode".to_owned(), "denied".to_owned());
        assert!(verify_subscription(&query).is_err());

        query.remove("hub.mode");
        assert!(verify_subscription(&query).is_err());
    }
}
