/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Vendor translators.

pub mod contosothings;
pub mod hue;
pub mod insteon;
pub mod nest;
pub mod smartthings;
pub mod vera;
pub mod wink;

use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use crate::translator::{ HubTranslator, TranslatorManifest };
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vendor {
    ContosoThings,
    Hue,
    Insteon,
    Nest,
    SmartThings,
    Vera,
    Wink,
}

impl Vendor {
    pub const ALL: [Vendor; 7] = [Vendor::ContosoThings, Vendor::Hue, Vendor::Insteon, Vendor::Nest,
                                  Vendor::SmartThings, Vendor::Vera, Vendor::Wink];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Vendor::ContosoThings => "contosothings",
            Vendor::Hue => "hue",
            Vendor::Insteon => "insteon",
            Vendor::Nest => "nest",
            Vendor::SmartThings => "smartthings",
            Vendor::Vera => "vera",
            Vendor::Wink => "wink",
        }
    }

    /// Every manifest the vendor ships, hub first.
    pub fn manifests(&self) -> Vec<&'static TranslatorManifest> {
        let (hub, devices): (&'static TranslatorManifest, Vec<_>) = match *self {
            Vendor::ContosoThings => (&contosothings::hub::HUB_MANIFEST,
                                      contosothings::hub::translator_map().manifests().collect()),
            Vendor::Hue => (&hue::hub::HUB_MANIFEST, hue::hub::translator_map().manifests().collect()),
            Vendor::Insteon =>
                (&insteon::hub::HUB_MANIFEST, insteon::hub::translator_map().manifests().collect()),
            Vendor::Nest => (&nest::hub::HUB_MANIFEST, nest::hub::translator_map().manifests().collect()),
            Vendor::SmartThings =>
                (&smartthings::hub::HUB_MANIFEST, smartthings::hub::translator_map().manifests().collect()),
            Vendor::Vera => (&vera::hub::HUB_MANIFEST, vera::hub::translator_map().manifests().collect()),
            Vendor::Wink => (&wink::hub::HUB_MANIFEST, wink::hub::translator_map().manifests().collect()),
        };
        let mut manifests = vec![hub];
        for manifest in devices {
            // Several vendor types may share one translator.
            if !manifests.iter().any(|m| std::ptr::eq(*m, manifest)) {
                manifests.push(manifest);
            }
        }
        manifests
    }

    /// Opens the vendor's hub translator with the account configured in
    /// `config`.
    pub fn open_hub(&self, config: &ConfigStore) -> Result<Box<dyn HubTranslator>> {
        Ok(match *self {
            Vendor::ContosoThings => Box::new(contosothings::Hub::from_config(config)?),
            Vendor::Hue => Box::new(hue::Hub::from_config(config)?),
            Vendor::Insteon => Box::new(insteon::Hub::from_config(config)?),
            Vendor::Nest => Box::new(nest::Hub::from_config(config)?),
            Vendor::SmartThings => Box::new(smartthings::Hub::from_config(config)?),
            Vendor::Vera => Box::new(vera::Hub::from_config(config)?),
            Vendor::Wink => Box::new(wink::Hub::from_config(config)?),
        })
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Vendor::ALL.iter()
            .cloned()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::NotFound(format!("vendor {}", s)))
    }
}

/// Every translator manifest in the crate.
pub fn manifests() -> Vec<&'static TranslatorManifest> {
    Vendor::ALL.iter().flat_map(|v| v.manifests()).collect()
}
