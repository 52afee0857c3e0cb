/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::resource::{ Resource, ResourceSpec };
use super::thermostat::Temperature;

/// Sensors are read-only; nothing here accepts updates.
pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec { id: "contact", rt: "oic.r.sensor.contact", writable: false },
    ResourceSpec { id: "motion", rt: "oic.r.sensor.motion", writable: false },
    ResourceSpec { id: "presence", rt: "oic.r.sensor.presence", writable: false },
    ResourceSpec { id: "water", rt: "oic.r.sensor.water", writable: false },
    ResourceSpec { id: "temperature", rt: "oic.r.temperature", writable: false },
    ResourceSpec { id: "humidity", rt: "oic.r.humidity", writable: false },
    ResourceSpec { id: "battery", rt: "oic.r.energy.battery", writable: false },
];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultisensorState {
    /// `true` when the contact is open.
    pub contact: Option<bool>,
    pub motion: Option<bool>,
    pub presence: Option<bool>,
    pub water: Option<bool>,
    pub temperature: Option<Temperature>,
    pub humidity: Option<f64>,
    /// Charge percentage.
    pub battery: Option<f64>,
}

impl MultisensorState {
    pub fn resources(&self) -> Vec<Resource> {
        let mut resources = Vec::new();
        let flags = [self.contact, self.motion, self.presence, self.water];
        for (spec, flag) in RESOURCES.iter().zip(flags.iter()) {
            if let Some(value) = *flag {
                resources.push(Resource::new(spec).with("value", value));
            }
        }
        if let Some(t) = self.temperature {
            resources.push(Resource::new(&RESOURCES[4])
                .with("temperature", t.value)
                .with("units", t.unit.as_str()));
        }
        if let Some(humidity) = self.humidity {
            resources.push(Resource::new(&RESOURCES[5]).with("humidity", humidity));
        }
        if let Some(battery) = self.battery {
            resources.push(Resource::new(&RESOURCES[6]).with("charge", battery));
        }
        resources
    }
}
