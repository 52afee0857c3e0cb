/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Z-Wave devices behind a Vera controller, through its `data_request`
//! HTTP interface.

pub mod api;
pub mod device;
pub mod hub;
pub mod structs;
pub mod thermostat;

pub use self::hub::Hub;

use self::api::VeraApi;
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "vera";

pub const SWITCH_POWER: &str = "urn:upnp-org:serviceId:SwitchPower1";
pub const DIMMING: &str = "urn:upnp-org:serviceId:Dimming1";
pub const HVAC_MODE: &str = "urn:upnp-org:serviceId:HVAC_UserOperatingMode1";
pub const HVAC_FAN: &str = "urn:upnp-org:serviceId:HVAC_FanOperatingMode1";
pub const HEAT_SETPOINT: &str = "urn:upnp-org:serviceId:TemperatureSetpoint1_Heat";
pub const COOL_SETPOINT: &str = "urn:upnp-org:serviceId:TemperatureSetpoint1_Cool";

#[derive(Clone)]
pub struct VeraDevice {
    pub api: Arc<VeraApi>,
    pub id: u32,
}
