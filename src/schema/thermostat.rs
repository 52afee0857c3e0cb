/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::resource::{ self, Resource, ResourceSpec };
use crate::error::{ Error, Result };
use serde_json::{ json, Value };

pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec { id: "ambientTemperature", rt: "oic.r.temperature", writable: false },
    ResourceSpec { id: "targetTemperature", rt: "oic.r.temperature", writable: true },
    ResourceSpec { id: "targetTemperatureHigh", rt: "oic.r.temperature", writable: true },
    ResourceSpec { id: "targetTemperatureLow", rt: "oic.r.temperature", writable: true },
    ResourceSpec { id: "hvacMode", rt: "oic.r.mode", writable: true },
    ResourceSpec { id: "awayMode", rt: "oic.r.mode", writable: true },
    ResourceSpec { id: "ecoMode", rt: "oic.r.sensor", writable: false },
    ResourceSpec { id: "humidity", rt: "oic.r.humidity", writable: false },
    ResourceSpec { id: "fanActive", rt: "oic.r.switch.binary", writable: true },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureUnit {
    C,
    F,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match *self {
            TemperatureUnit::C => "C",
            TemperatureUnit::F => "F",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "C" | "CELSIUS" => Some(TemperatureUnit::C),
            "F" | "FAHRENHEIT" => Some(TemperatureUnit::F),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Temperature {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl Temperature {
    pub fn celsius(value: f64) -> Self {
        Temperature { value: value, unit: TemperatureUnit::C }
    }

    pub fn fahrenheit(value: f64) -> Self {
        Temperature { value: value, unit: TemperatureUnit::F }
    }

    /// Converts, rounding to one decimal place.
    pub fn to(&self, unit: TemperatureUnit) -> Temperature {
        let value = match (self.unit, unit) {
            (TemperatureUnit::C, TemperatureUnit::F) => self.value * 9.0 / 5.0 + 32.0,
            (TemperatureUnit::F, TemperatureUnit::C) => (self.value - 32.0) * 5.0 / 9.0,
            _ => self.value,
        };
        Temperature { value: (value * 10.0).round() / 10.0, unit: unit }
    }

    fn resource(&self, spec: &ResourceSpec) -> Resource {
        Resource::new(spec)
            .with("temperature", self.value)
            .with("units", self.unit.as_str())
    }

    fn from_payload(payload: &Value, resource_id: &str) -> Result<Self> {
        let value = resource::number_field(payload, "temperature", resource_id)?;
        let unit = match resource::optional_string(payload, "units") {
            Some(raw) => TemperatureUnit::parse(&raw).ok_or_else(|| {
                Error::BadRequest(format!("{}.units must be C or F, got {}", resource_id, raw))
            })?,
            None => TemperatureUnit::C,
        };
        Ok(Temperature { value: value, unit: unit })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HvacMode {
    Auto,
    HeatOnly,
    CoolOnly,
    Eco,
    Off,
}

impl HvacMode {
    pub const ALL: [HvacMode; 5] =
        [HvacMode::Auto, HvacMode::HeatOnly, HvacMode::CoolOnly, HvacMode::Eco, HvacMode::Off];

    pub fn as_str(&self) -> &'static str {
        match *self {
            HvacMode::Auto => "auto",
            HvacMode::HeatOnly => "heatOnly",
            HvacMode::CoolOnly => "coolOnly",
            HvacMode::Eco => "eco",
            HvacMode::Off => "off",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        HvacMode::ALL.iter().cloned().find(|m| m.as_str() == raw)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThermostatState {
    pub ambient: Option<Temperature>,
    pub target: Option<Temperature>,
    pub target_high: Option<Temperature>,
    pub target_low: Option<Temperature>,
    pub hvac_mode: Option<HvacMode>,
    pub supported_modes: Vec<HvacMode>,
    pub away: Option<bool>,
    pub eco: Option<bool>,
    /// Relative humidity percentage.
    pub humidity: Option<f64>,
    pub fan_active: Option<bool>,
}

impl ThermostatState {
    pub fn resources(&self) -> Vec<Resource> {
        let mut resources = Vec::new();
        let temperatures = [
            (&RESOURCES[0], self.ambient),
            (&RESOURCES[1], self.target),
            (&RESOURCES[2], self.target_high),
            (&RESOURCES[3], self.target_low),
        ];
        for (spec, temperature) in temperatures.iter() {
            if let Some(t) = *temperature {
                resources.push(t.resource(spec));
            }
        }
        if let Some(mode) = self.hvac_mode {
            let supported: Vec<&str> = if self.supported_modes.is_empty() {
                vec![mode.as_str()]
            } else {
                self.supported_modes.iter().map(HvacMode::as_str).collect()
            };
            resources.push(Resource::new(&RESOURCES[4])
                .with("modes", json!([mode.as_str()]))
                .with("supportedModes", json!(supported)));
        }
        if let Some(away) = self.away {
            resources.push(Resource::new(&RESOURCES[5])
                .with("modes", json!([if away { "away" } else { "home" }]))
                .with("supportedModes", json!(["home", "away"])));
        }
        if let Some(eco) = self.eco {
            resources.push(Resource::new(&RESOURCES[6]).with("value", eco));
        }
        if let Some(humidity) = self.humidity {
            resources.push(Resource::new(&RESOURCES[7]).with("humidity", humidity));
        }
        if let Some(fan) = self.fan_active {
            resources.push(Resource::new(&RESOURCES[8]).with("value", fan));
        }
        resources
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThermostatUpdate {
    pub target: Option<Temperature>,
    pub target_high: Option<Temperature>,
    pub target_low: Option<Temperature>,
    pub hvac_mode: Option<HvacMode>,
    pub away: Option<bool>,
    pub fan_active: Option<bool>,
}

impl ThermostatUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ThermostatUpdate::default()
    }

    pub(crate) fn merge(&mut self, resource_id: &str, payload: &Value) -> Result<()> {
        let spec = resource::writable_spec(RESOURCES, resource_id)?;
        match spec.id {
            "targetTemperature" => self.target = Some(Temperature::from_payload(payload, spec.id)?),
            "targetTemperatureHigh" =>
                self.target_high = Some(Temperature::from_payload(payload, spec.id)?),
            "targetTemperatureLow" =>
                self.target_low = Some(Temperature::from_payload(payload, spec.id)?),
            "hvacMode" => {
                let raw = resource::mode_field(payload, spec.id)?;
                let mode = HvacMode::parse(&raw).ok_or_else(|| {
                    Error::BadRequest(format!("unsupported hvac mode {}", raw))
                })?;
                self.hvac_mode = Some(mode);
            },
            "awayMode" => {
                self.away = Some(match resource::mode_field(payload, spec.id)?.as_str() {
                    "away" => true,
                    "home" => false,
                    other => return Err(Error::BadRequest(format!("unsupported away mode {}", other))),
                });
            },
            "fanActive" => self.fan_active = Some(resource::bool_field(payload, "value", spec.id)?),
            other => return Err(Error::NotFound(format!("resource {}", other))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units() {
        assert_eq!(Temperature::celsius(21.0).to(TemperatureUnit::F), Temperature::fahrenheit(69.8));
        assert_eq!(Temperature::fahrenheit(68.0).to(TemperatureUnit::C), Temperature::celsius(20.0));
        assert_eq!(TemperatureUnit::parse("fahrenheit"), Some(TemperatureUnit::F));
    }

    #[test]
    fn resources_follow_state() {
        let state = ThermostatState {
            ambient: Some(Temperature::celsius(20.5)),
            hvac_mode: Some(HvacMode::HeatOnly),
            supported_modes: vec![HvacMode::HeatOnly, HvacMode::Off],
            away: Some(true),
            ..Default::default()
        };
        let resources = state.resources();
        let ids: Vec<_> = resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ambientTemperature", "hvacMode", "awayMode"]);
        assert_eq!(resources[0].value("units"), Some(&json!("C")));
        assert_eq!(resources[1].value("supportedModes"), Some(&json!(["heatOnly", "off"])));
        assert_eq!(resources[2].value("modes"), Some(&json!(["away"])));
    }

    #[test]
    fn parses_updates() {
        let mut update = ThermostatUpdate::default();
        update.merge("targetTemperature", &json!({ "temperature": 70, "units": "F" })).unwrap();
        update.merge("hvacMode", &json!({ "modes": ["coolOnly"] })).unwrap();
        update.merge("awayMode", &json!({ "modes": ["home"] })).unwrap();
        assert_eq!(update.target, Some(Temperature::fahrenheit(70.0)));
        assert_eq!(update.hvac_mode, Some(HvacMode::CoolOnly));
        assert_eq!(update.away, Some(false));
    }

    #[test]
    fn rejects_bad_updates() {
        let mut update = ThermostatUpdate::default();
        assert!(update.merge("hvacMode", &json!({ "modes": ["turbo"] })).is_err());
        assert!(update.merge("targetTemperature", &json!({ "temperature": 20, "units": "K" })).is_err());
        assert_eq!(update.merge("ambientTemperature", &json!({ "temperature": 20 })).unwrap_err().status(), 400);
        assert!(update.is_empty());
    }
}
