/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Section/key configuration store.
//!
//! Values are plain strings grouped by section (usually a vendor name) and
//! persisted as a JSON object of objects. Any value can be overridden from
//! the environment with `T2T_<SECTION>_<KEY>`, which is how access tokens are
//! normally handed to the CLI.

use crate::error::{ Error, Result };
use log::{ debug, warn };
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{ Path, PathBuf };
use std::str::FromStr;
use std::sync::RwLock;

type Sections = BTreeMap<String, BTreeMap<String, String>>;

pub struct ConfigStore {
    path: Option<PathBuf>,
    sections: RwLock<Sections>,
}

impl ConfigStore {
    /// Opens the store at `path`. A missing file yields an empty store which
    /// is created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let sections = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Sections::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::Config(format!("unable to parse {}: {}", path.display(), e))
                })?
            }
        } else {
            debug!("Config file {} does not exist yet", path.display());
            Sections::new()
        };
        Ok(ConfigStore {
            path: Some(path),
            sections: RwLock::new(sections),
        })
    }

    pub fn in_memory() -> Self {
        ConfigStore {
            path: None,
            sections: RwLock::new(Sections::new()),
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        if let Ok(value) = env::var(env_key(section, key)) {
            return Some(value);
        }
        self.sections.read().unwrap()
            .get(section)
            .and_then(|s| s.get(key))
            .cloned()
    }

    /// Like `get`, but a missing value is a configuration error naming the
    /// environment variable that would provide it.
    pub fn require(&self, section: &str, key: &str) -> Result<String> {
        self.get(section, key).ok_or_else(|| {
            Error::Config(format!("missing {}.{} (or {})", section, key, env_key(section, key)))
        })
    }

    pub fn get_parsed<T: FromStr>(&self, section: &str, key: &str, default: T) -> T {
        match self.get(section, key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring unparsable config value {}.{} = {:?}", section, key, raw);
                default
            }),
            None => default,
        }
    }

    pub fn set(&self, section: &str, key: &str, value: &str) -> Result<()> {
        {
            let mut sections = self.sections.write().unwrap();
            sections.entry(section.to_owned())
                .or_default()
                .insert(key.to_owned(), value.to_owned());
        }
        self.save()
    }

    /// Returns the stored value, storing `default` first if there is none.
    pub fn get_or_set_default(&self, section: &str, key: &str, default: &str) -> String {
        if let Some(value) = self.get(section, key) {
            return value;
        }
        if let Err(e) = self.set(section, key, default) {
            warn!("Unable to persist default for {}.{}: {}", section, key, e);
        }
        default.to_owned()
    }

    fn save(&self) -> Result<()> {
        let path = match self.path {
            Some(ref path) => path,
            None => return Ok(()),
        };
        let content = {
            let sections = self.sections.read().unwrap();
            serde_json::to_string_pretty(&*sections)?
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }
}

fn env_key(section: &str, key: &str) -> String {
    format!("T2T_{}_{}", section, key).to_uppercase().replace('-', "_")
}
