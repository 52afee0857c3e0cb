/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Wink devices, through the Wink cloud API.

pub mod api;
pub mod binary_switch;
pub mod device;
pub mod hub;
pub mod lightbulb;
pub mod sensor_pod;
pub mod structs;
pub mod thermostat;

pub use self::hub::Hub;

use self::api::WinkApi;
use crate::error::{ Error, Result };
use std::sync::Arc;

pub(crate) const CONFIG_SECTION: &str = "wink";

/// A device as addressed by the Wink API: type and id.
#[derive(Clone)]
pub struct WinkDevice {
    pub api: Arc<WinkApi>,
    pub object_type: String,
    pub object_id: String,
}

impl WinkDevice {
    pub fn control_id(&self) -> String {
        control_id(&self.object_type, &self.object_id)
    }
}

/// Wink object ids are only unique within an object type, so control ids
/// carry both: `<object_type>/<object_id>`.
pub fn control_id(object_type: &str, object_id: &str) -> String {
    format!("{}/{}", object_type, object_id)
}

/// Splits a control id back into object type and object id.
pub fn split_control_id(control_id: &str) -> Result<(&str, &str)> {
    match control_id.split_once('/') {
        Some((object_type, object_id)) if !object_type.is_empty() && !object_id.is_empty() => {
            Ok((object_type, object_id))
        },
        _ => Err(Error::NotFound(format!("wink device {} (expected <object_type>/<object_id>)", control_id))),
    }
}
