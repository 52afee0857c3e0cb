/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Nest thermostats, through the Nest developer REST API.

pub mod api;
pub mod hub;
pub mod structs;
pub mod thermostat;

pub use self::hub::Hub;

use self::api::NestApi;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "nest";

#[derive(Clone)]
pub struct NestDevice {
    pub api: Arc<NestApi>,
    pub device_id: String,
}
