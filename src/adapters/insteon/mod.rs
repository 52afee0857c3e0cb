/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Insteon devices, through the Insteon cloud command queue.

pub mod api;
pub mod device;
pub mod hub;
pub mod structs;

pub use self::hub::Hub;

use self::api::InsteonApi;
use self::structs::DeviceEntry;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "insteon";

#[derive(Clone)]
pub struct InsteonDevice {
    pub api: Arc<InsteonApi>,
    pub entry: DeviceEntry,
}
