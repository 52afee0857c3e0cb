/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! ContosoThings devices, through the ContosoThings cloud service.

pub mod api;
pub mod device;
pub mod hub;
pub mod structs;
pub mod thermostat;

pub use self::hub::Hub;

use self::api::ContosoApi;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "contosothings";

#[derive(Clone)]
pub struct ContosoDevice {
    pub api: Arc<ContosoApi>,
    pub id: String,
}
