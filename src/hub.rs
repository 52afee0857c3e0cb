/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Device discovery plumbing shared by the hub translators.
//!
//! A hub lists the devices of an account, looks up each device's vendor type
//! in its `TranslatorMap`, instantiates (or reuses) a device translator for
//! every supported device and reads them all concurrently. With
//! `JoinPolicy::Settled` devices that fail to answer are reported in
//! `HubResponse::errors` instead of failing the whole listing.

use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::schema::{ Platform, Schema };
use crate::translator::{ DeviceTranslator, TranslatorManifest };
use futures::future::{ join_all, try_join_all };
use log::{ debug, warn };
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{ Arc, RwLock };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinPolicy {
    /// The listing fails if any device fails.
    All,
    /// Every device is waited for; failures are reported per device.
    Settled,
}

impl JoinPolicy {
    pub fn from_config(config: &ConfigStore) -> Self {
        config.get_parsed("hub", "join_policy", JoinPolicy::Settled)
    }
}

impl FromStr for JoinPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(JoinPolicy::All),
            "settled" => Ok(JoinPolicy::Settled),
            other => Err(Error::Config(format!("unknown join policy {}", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformError {
    #[serde(rename = "controlId")]
    pub control_id: String,
    pub translator: String,
    pub status: u16,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HubResponse {
    pub schema: String,
    pub platforms: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PlatformError>,
}

impl HubResponse {
    pub fn new(platforms: Vec<Platform>, errors: Vec<PlatformError>) -> Self {
        HubResponse {
            schema: Schema::Hub.id().to_owned(),
            platforms: platforms,
            errors: errors,
        }
    }
}

pub struct TranslatorEntry<D> {
    pub manifest: &'static TranslatorManifest,
    pub build: fn(D) -> Arc<dyn DeviceTranslator>,
}

/// Vendor device type → translator. Type keys match case-insensitively.
pub struct TranslatorMap<D> {
    entries: Vec<(&'static str, TranslatorEntry<D>)>,
}

impl<D> TranslatorMap<D> {
    pub fn new() -> Self {
        TranslatorMap { entries: Vec::new() }
    }

    pub fn with(mut self, kind: &'static str, manifest: &'static TranslatorManifest,
                build: fn(D) -> Arc<dyn DeviceTranslator>) -> Self {
        self.entries.push((kind, TranslatorEntry { manifest: manifest, build: build }));
        self
    }

    pub fn resolve(&self, kind: &str) -> Option<&TranslatorEntry<D>> {
        self.entries.iter()
            .find(|&&(k, _)| k.eq_ignore_ascii_case(kind))
            .map(|&(_, ref entry)| entry)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(k, _)| k)
    }

    pub fn manifests(&self) -> impl Iterator<Item = &'static TranslatorManifest> + '_ {
        self.entries.iter().map(|&(_, ref e)| e.manifest)
    }
}

impl<D> Default for TranslatorMap<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Device translators by control id, created on first use.
#[derive(Default)]
pub struct TranslatorCache {
    translators: RwLock<HashMap<String, Arc<dyn DeviceTranslator>>>,
}

impl TranslatorCache {
    pub fn get(&self, control_id: &str) -> Option<Arc<dyn DeviceTranslator>> {
        self.translators.read().unwrap().get(control_id).cloned()
    }

    /// The cached translator for `control_id`, or a new one from `create`.
    /// A cached translator built from another manifest is replaced.
    pub fn get_or_insert_with<F>(&self, control_id: &str, manifest: &'static TranslatorManifest, create: F)
        -> Arc<dyn DeviceTranslator>
        where F: FnOnce() -> Arc<dyn DeviceTranslator>
    {
        let same = |t: &Arc<dyn DeviceTranslator>| t.manifest().name == manifest.name;
        if let Some(existing) = self.get(control_id).filter(same) {
            return existing;
        }
        let mut translators = self.translators.write().unwrap();
        match translators.get(control_id) {
            Some(existing) if same(existing) => existing.clone(),
            _ => {
                let created = create();
                translators.insert(control_id.to_owned(), created.clone());
                created
            },
        }
    }

    pub fn invalidate(&self, control_id: &str) {
        self.translators.write().unwrap().remove(control_id);
    }

    pub fn len(&self) -> usize {
        self.translators.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A device as listed by a vendor hub, before translation.
pub struct Discovered<D> {
    pub control_id: String,
    pub kind: String,
    pub device: D,
}

/// The part of a hub translator that does not depend on the vendor.
pub struct HubCore<D> {
    vendor: &'static str,
    map: TranslatorMap<D>,
    cache: TranslatorCache,
    policy: JoinPolicy,
}

impl<D> HubCore<D> {
    pub fn new(vendor: &'static str, map: TranslatorMap<D>, policy: JoinPolicy) -> Self {
        HubCore {
            vendor: vendor,
            map: map,
            cache: TranslatorCache::default(),
            policy: policy,
        }
    }

    pub fn map(&self) -> &TranslatorMap<D> {
        &self.map
    }

    pub fn cache(&self) -> &TranslatorCache {
        &self.cache
    }

    pub fn policy(&self) -> JoinPolicy {
        self.policy
    }

    pub fn cached(&self, control_id: &str) -> Option<Arc<dyn DeviceTranslator>> {
        self.cache.get(control_id)
    }

    /// Translators for every supported device, in discovery order.
    pub fn instantiate(&self, devices: Vec<Discovered<D>>) -> Vec<Arc<dyn DeviceTranslator>> {
        let mut translators = Vec::with_capacity(devices.len());
        for discovered in devices {
            match self.map.resolve(&discovered.kind) {
                Some(entry) => {
                    let build = entry.build;
                    let device = discovered.device;
                    translators.push(self.cache.get_or_insert_with(&discovered.control_id, entry.manifest,
                        move || build(device)));
                },
                None => {
                    debug!("Skipping {} device {} of unsupported type `{}`",
                        self.vendor, discovered.control_id, discovered.kind);
                },
            }
        }
        translators
    }

    /// Picks `control_id` out of a fresh device listing.
    pub fn find(&self, devices: Vec<Discovered<D>>, control_id: &str) -> Result<Arc<dyn DeviceTranslator>> {
        let discovered = devices.into_iter()
            .find(|d| d.control_id == control_id)
            .ok_or_else(|| Error::NotFound(format!("{} device {}", self.vendor, control_id)))?;
        let entry = self.map.resolve(&discovered.kind).ok_or_else(|| {
            Error::NotImplemented(format!("{} device type `{}`", self.vendor, discovered.kind))
        })?;
        let build = entry.build;
        let device = discovered.device;
        Ok(self.cache.get_or_insert_with(control_id, entry.manifest, move || build(device)))
    }

    pub async fn platforms(&self, devices: Vec<Discovered<D>>, expand: bool) -> Result<HubResponse> {
        let translators = self.instantiate(devices);
        aggregate(&translators, self.policy, expand).await
    }
}

/// Reads every translator concurrently and merges the results.
pub async fn aggregate(translators: &[Arc<dyn DeviceTranslator>], policy: JoinPolicy, expand: bool)
    -> Result<HubResponse>
{
    match policy {
        JoinPolicy::All => {
            let platforms = try_join_all(translators.iter().map(|t| t.get(expand))).await?;
            Ok(HubResponse::new(platforms, Vec::new()))
        },
        JoinPolicy::Settled => {
            let results = join_all(translators.iter().map(|t| t.get(expand))).await;
            let mut platforms = Vec::new();
            let mut errors = Vec::new();
            for (translator, result) in translators.iter().zip(results) {
                match result {
                    Ok(platform) => platforms.push(platform),
                    Err(e) => {
                        warn!("{} {} failed: {}", translator.manifest().name, translator.control_id(), e);
                        errors.push(PlatformError {
                            control_id: translator.control_id().to_owned(),
                            translator: translator.manifest().name.to_owned(),
                            status: e.status(),
                            message: e.to_string(),
                        });
                    },
                }
            }
            Ok(HubResponse::new(platforms, errors))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ DeviceState, DeviceUpdate, PlatformInfo, SwitchState };
    use crate::translator::Snapshot;
    use async_trait::async_trait;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    static SWITCH: TranslatorManifest = TranslatorManifest {
        name: "opent2t-translator-com-test-binaryswitch",
        vendor: "test",
        schema: Schema::BinarySwitch,
        resources: &["power"],
        writable: &["power"],
    };

    static OUTLET: TranslatorManifest = TranslatorManifest {
        name: "opent2t-translator-com-test-outlet",
        vendor: "test",
        schema: Schema::BinarySwitch,
        resources: &["power"],
        writable: &["power"],
    };

    struct Fake {
        id: String,
        fail: bool,
        manifest: &'static TranslatorManifest,
    }

    #[async_trait]
    impl DeviceTranslator for Fake {
        fn manifest(&self) -> &'static TranslatorManifest {
            self.manifest
        }

        fn control_id(&self) -> &str {
            &self.id
        }

        async fn snapshot(&self) -> Result<Snapshot> {
            if self.fail {
                return Err(Error::Vendor { status: 503, message: "offline".to_owned() });
            }
            Ok(Snapshot {
                info: PlatformInfo { control_id: self.id.clone(), ..Default::default() },
                state: DeviceState::BinarySwitch(SwitchState { on: true }),
            })
        }

        async fn apply(&self, _: &DeviceUpdate) -> Result<()> {
            Ok(())
        }
    }

    struct FakeDevice {
        id: &'static str,
        fail: bool,
        builds: Arc<AtomicUsize>,
    }

    fn build(device: FakeDevice) -> Arc<dyn DeviceTranslator> {
        device.builds.fetch_add(1, Ordering::SeqCst);
        Arc::new(Fake { id: device.id.to_owned(), fail: device.fail, manifest: &SWITCH })
    }

    fn core(policy: JoinPolicy) -> HubCore<FakeDevice> {
        HubCore::new("test", TranslatorMap::new().with("switch", &SWITCH, build), policy)
    }

    fn listing(builds: &Arc<AtomicUsize>) -> Vec<Discovered<FakeDevice>> {
        [("a", "Switch", false), ("b", "switch", true), ("c", "camera", false), ("d", "switch", false)]
            .iter()
            .map(|&(id, kind, fail)| Discovered {
                control_id: id.to_owned(),
                kind: kind.to_owned(),
                device: FakeDevice { id: id, fail: fail, builds: builds.clone() },
            })
            .collect()
    }

    #[tokio::test]
    async fn settled_keeps_successes() {
        let hub = core(JoinPolicy::Settled);
        let builds = Arc::new(AtomicUsize::new(0));
        let response = hub.platforms(listing(&builds), true).await.unwrap();
        assert_eq!(response.schema, "org.opent2t.sample.hub.superpopular");
        let ids: Vec<_> = response.platforms.iter().map(|p| p.opent2t.control_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].control_id, "b");
        assert_eq!(response.errors[0].status, 503);
    }

    #[tokio::test]
    async fn all_fails_on_first_error() {
        let hub = core(JoinPolicy::All);
        let builds = Arc::new(AtomicUsize::new(0));
        let err = hub.platforms(listing(&builds), true).await.unwrap_err();
        assert_eq!(err.status(), 503);
    }

    #[test]
    fn translators_are_created_once() {
        let hub = core(JoinPolicy::Settled);
        let builds = Arc::new(AtomicUsize::new(0));
        hub.instantiate(listing(&builds));
        assert_eq!(builds.load(Ordering::SeqCst), 3);
        let again = hub.instantiate(listing(&builds));
        assert_eq!(again.len(), 3);
        assert_eq!(builds.load(Ordering::SeqCst), 3);
        assert_eq!(hub.cache().len(), 3);

        hub.cache().invalidate("a");
        assert!(hub.cached("a").is_none());
    }

    #[test]
    fn cache_rebuilds_when_the_manifest_changes() {
        let cache = TranslatorCache::default();
        let fake = |manifest: &'static TranslatorManifest| -> Arc<dyn DeviceTranslator> {
            Arc::new(Fake { id: "1".to_owned(), fail: false, manifest: manifest })
        };
        let first = cache.get_or_insert_with("1", &SWITCH, || fake(&SWITCH));
        let again = cache.get_or_insert_with("1", &SWITCH, || panic!("cached translator was rebuilt"));
        assert!(Arc::ptr_eq(&first, &again));

        let outlet = cache.get_or_insert_with("1", &OUTLET, || fake(&OUTLET));
        assert_eq!(outlet.manifest().name, OUTLET.name);
        assert_eq!(cache.get("1").unwrap().manifest().name, OUTLET.name);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn find_distinguishes_missing_and_unsupported() {
        let hub = core(JoinPolicy::Settled);
        let builds = Arc::new(AtomicUsize::new(0));
        assert_eq!(hub.find(listing(&builds), "zz").err().unwrap().status(), 404);
        assert_eq!(hub.find(listing(&builds), "c").err().unwrap().status(), 501);
        assert_eq!(hub.find(listing(&builds), "d").unwrap().control_id(), "d");
    }

    #[test]
    fn policy_from_config() {
        let config = ConfigStore::in_memory();
        assert_eq!(JoinPolicy::from_config(&config), JoinPolicy::Settled);
        config.set("hub", "join_policy", "all").unwrap();
        assert_eq!(JoinPolicy::from_config(&config), JoinPolicy::All);
    }
}
