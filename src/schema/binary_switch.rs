/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::resource::{ self, Resource, ResourceSpec };
use crate::error::Result;
use serde_json::Value;

pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec { id: "power", rt: "oic.r.switch.binary", writable: true },
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwitchState {
    pub on: bool,
}

impl SwitchState {
    pub fn resources(&self) -> Vec<Resource> {
        vec![Resource::new(&RESOURCES[0]).with("value", self.on)]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwitchUpdate {
    pub on: Option<bool>,
}

impl SwitchUpdate {
    pub fn is_empty(&self) -> bool {
        self.on.is_none()
    }

    pub(crate) fn merge(&mut self, resource_id: &str, payload: &Value) -> Result<()> {
        let spec = resource::writable_spec(RESOURCES, resource_id)?;
        self.on = Some(resource::bool_field(payload, "value", spec.id)?);
        Ok(())
    }
}
