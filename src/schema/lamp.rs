/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::resource::{ self, Resource, ResourceSpec };
use crate::error::{ Error, Result };
use serde_json::{ json, Value };

pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec { id: "power", rt: "oic.r.switch.binary", writable: true },
    ResourceSpec { id: "dim", rt: "oic.r.light.dimming", writable: true },
    ResourceSpec { id: "colourMode", rt: "oic.r.mode", writable: false },
    ResourceSpec { id: "colourRGB", rt: "oic.r.colour.rgb", writable: true },
    ResourceSpec { id: "colourTemperature", rt: "oic.r.colour.colourtemperature", writable: true },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColourMode {
    Rgb,
    Temperature,
}

impl ColourMode {
    pub fn as_str(&self) -> &'static str {
        match *self {
            ColourMode::Rgb => "rgb",
            ColourMode::Temperature => "ct",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LampState {
    pub on: bool,
    /// Brightness percentage.
    pub dim: Option<u8>,
    pub mode: Option<ColourMode>,
    pub rgb: Option<[u8; 3]>,
    pub temperature_k: Option<u32>,
}

impl LampState {
    pub fn resources(&self) -> Vec<Resource> {
        let mut resources = vec![Resource::new(&RESOURCES[0]).with("value", self.on)];
        if let Some(dim) = self.dim {
            resources.push(Resource::new(&RESOURCES[1])
                .with("dimmingSetting", dim)
                .with("range", json!([0, 100])));
        }
        if let Some(mode) = self.mode {
            resources.push(Resource::new(&RESOURCES[2])
                .with("modes", json!([mode.as_str()]))
                .with("supportedModes", json!(["rgb", "ct"])));
        }
        if let Some(rgb) = self.rgb {
            resources.push(Resource::new(&RESOURCES[3])
                .with("rgbValue", json!(rgb))
                .with("range", json!([0, 255])));
        }
        if let Some(kelvin) = self.temperature_k {
            resources.push(Resource::new(&RESOURCES[4]).with("ct", kelvin));
        }
        resources
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LampUpdate {
    pub on: Option<bool>,
    pub dim: Option<u8>,
    pub rgb: Option<[u8; 3]>,
    pub temperature_k: Option<u32>,
}

impl LampUpdate {
    pub fn is_empty(&self) -> bool {
        *self == LampUpdate::default()
    }

    pub(crate) fn merge(&mut self, resource_id: &str, payload: &Value) -> Result<()> {
        let spec = resource::writable_spec(RESOURCES, resource_id)?;
        match spec.id {
            "power" => self.on = Some(resource::bool_field(payload, "value", spec.id)?),
            "dim" => {
                let dim = resource::ranged_field(payload, "dimmingSetting", spec.id, 0.0, 100.0)?;
                self.dim = Some(dim.round() as u8);
            },
            "colourRGB" => {
                self.rgb = Some(resource::rgb_field(payload, "rgbValue", spec.id)?);
                self.temperature_k = None;
            },
            "colourTemperature" => {
                let kelvin = resource::ranged_field(payload, "ct", spec.id, 1000.0, 10000.0)?;
                self.temperature_k = Some(kelvin.round() as u32);
                self.rgb = None;
            },
            other => return Err(Error::NotFound(format!("resource {}", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_unknown_capabilities() {
        let state = LampState { on: true, dim: Some(40), ..Default::default() };
        let ids: Vec<_> = state.resources().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["power", "dim"]);
    }

    #[test]
    fn colour_resources() {
        let state = LampState {
            on: false,
            dim: None,
            mode: Some(ColourMode::Rgb),
            rgb: Some([10, 20, 30]),
            temperature_k: Some(2700),
        };
        let resources = state.resources();
        assert_eq!(resources[1].value("modes"), Some(&json!(["rgb"])));
        assert_eq!(resources[2].value("rgbValue"), Some(&json!([10, 20, 30])));
        assert_eq!(resources[3].value("ct"), Some(&json!(2700)));
    }

    #[test]
    fn colour_and_temperature_are_exclusive() {
        let mut update = LampUpdate::default();
        update.merge("colourTemperature", &json!({ "ct": 3000 })).unwrap();
        update.merge("colourRGB", &json!({ "rgbValue": [255, 0, 0] })).unwrap();
        assert_eq!(update.rgb, Some([255, 0, 0]));
        assert_eq!(update.temperature_k, None);
    }

    #[test]
    fn rejects_mode_and_bad_dim() {
        let mut update = LampUpdate::default();
        assert_eq!(update.merge("colourMode", &json!({ "modes": ["rgb"] })).unwrap_err().status(), 400);
        assert!(update.merge("dim", &json!({ "dimmingSetting": -1 })).is_err());
        assert!(update.merge("power", &json!({ "value": "on" })).is_err());
        assert!(update.is_empty());
    }
}
