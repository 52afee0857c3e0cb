/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Philips Hue bridges, over the bridge's local REST API.

pub mod discovery;
pub mod hub;
pub mod hub_api;
pub mod light;
pub mod structs;

pub use self::hub::Hub;

use self::hub_api::HubApi;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "hue";

/// What a Hue device translator needs: the bridge and the light's id on it.
#[derive(Clone)]
pub struct HueDevice {
    pub api: Arc<HubApi>,
    pub light_id: String,
}
