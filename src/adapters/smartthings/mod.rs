/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! SmartThings devices, through the OpenT2T SmartApp's web services.

pub mod api;
pub mod device;
pub mod hub;
pub mod structs;
pub mod thermostat;

pub use self::hub::Hub;

use self::api::SmartThingsApi;
use crate::schema::TemperatureUnit;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "smartthings";

#[derive(Clone)]
pub struct SmartThingsDevice {
    pub api: Arc<SmartThingsApi>,
    pub id: String,
    /// The location's temperature scale.
    pub unit: TemperatureUnit,
}
