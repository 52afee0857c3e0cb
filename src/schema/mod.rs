/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Normalized device documents.
//!
//! Every translator, whatever the vendor, answers with a `Platform`: an
//! `opent2t` metadata block naming the schema and translator, and a list of
//! entities each carrying OCF-style resources. Translators never build
//! that JSON themselves; they produce a typed `DeviceState` and the shape is
//! rendered here, so all vendors agree on resource names and value fields.

pub mod binary_switch;
pub mod lamp;
pub mod multisensor;
mod resource;
pub mod thermostat;

pub use self::binary_switch::{ SwitchState, SwitchUpdate };
pub use self::lamp::{ ColourMode, LampState, LampUpdate };
pub use self::multisensor::MultisensorState;
pub use self::resource::{ Resource, ResourceSpec };
pub use self::thermostat::{ HvacMode, Temperature, TemperatureUnit, ThermostatState, ThermostatUpdate };

use crate::error::{ Error, Result };
use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

const ICV: &str = "core.1.1.0";
const DMV: &str = "res.1.1.0";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Schema {
    Lamp,
    Thermostat,
    BinarySwitch,
    Multisensor,
    Hub,
}

impl Schema {
    pub const ALL: [Schema; 5] =
        [Schema::Lamp, Schema::Thermostat, Schema::BinarySwitch, Schema::Multisensor, Schema::Hub];

    pub fn id(&self) -> &'static str {
        match *self {
            Schema::Lamp => "org.opent2t.sample.lamp.superpopular",
            Schema::Thermostat => "org.opent2t.sample.thermostat.superpopular",
            Schema::BinarySwitch => "org.opent2t.sample.binaryswitch.superpopular",
            Schema::Multisensor => "org.opent2t.sample.multisensor.superpopular",
            Schema::Hub => "org.opent2t.sample.hub.superpopular",
        }
    }

    pub fn from_id(id: &str) -> Option<Schema> {
        Schema::ALL.iter().cloned().find(|s| s.id() == id)
    }

    /// The resource interface of the schema. The hub schema has none; it
    /// only aggregates platforms.
    pub fn resources(&self) -> &'static [ResourceSpec] {
        match *self {
            Schema::Lamp => lamp::RESOURCES,
            Schema::Thermostat => thermostat::RESOURCES,
            Schema::BinarySwitch => binary_switch::RESOURCES,
            Schema::Multisensor => multisensor::RESOURCES,
            Schema::Hub => &[],
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Descriptive data about one physical device.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformInfo {
    /// The vendor's identifier for the device.
    pub control_id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenT2TMeta {
    pub schema: String,
    pub translator: String,
    #[serde(rename = "controlId")]
    pub control_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub n: String,
    pub rt: Vec<String>,
    pub di: String,
    pub icv: String,
    pub dmv: String,
    pub resources: Vec<Resource>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub opent2t: OpenT2TMeta,
    pub pi: String,
    pub mnmn: String,
    pub mnmo: String,
    pub n: String,
    pub rt: Vec<String>,
    pub entities: Vec<Entity>,
}

impl Platform {
    /// Renders a device state. Without `expand` the resources are listed
    /// without their values.
    pub fn build(info: &PlatformInfo, translator: &str, state: &DeviceState, expand: bool) -> Platform {
        let schema = state.schema();
        let resources = state.resources()
            .into_iter()
            .map(|r| if expand { r } else { r.collapse() })
            .collect();

        Platform {
            opent2t: OpenT2TMeta {
                schema: schema.id().to_owned(),
                translator: translator.to_owned(),
                control_id: info.control_id.clone(),
            },
            pi: stable_id(translator, &info.control_id, "platform"),
            mnmn: info.manufacturer.clone(),
            mnmo: info.model.clone(),
            n: info.name.clone(),
            rt: vec![schema.id().to_owned()],
            entities: vec![Entity {
                n: info.name.clone(),
                rt: vec![schema.id().to_owned()],
                di: stable_id(translator, &info.control_id, "entity"),
                icv: ICV.to_owned(),
                dmv: DMV.to_owned(),
                resources: resources,
            }],
        }
    }

    pub fn schema(&self) -> Option<Schema> {
        Schema::from_id(&self.opent2t.schema)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entities.iter().flat_map(|e| e.resources.iter())
    }

    pub fn find_resource(&self, id: &str) -> Option<&Resource> {
        self.resources().find(|r| r.id == id)
    }
}

/// Identifiers that stay the same across requests for the same device.
pub fn stable_id(translator: &str, control_id: &str, kind: &str) -> String {
    let name = format!("{}/{}/{}", translator, control_id, kind);
    Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceState {
    Lamp(LampState),
    Thermostat(ThermostatState),
    BinarySwitch(SwitchState),
    Multisensor(MultisensorState),
}

impl DeviceState {
    pub fn schema(&self) -> Schema {
        match *self {
            DeviceState::Lamp(_) => Schema::Lamp,
            DeviceState::Thermostat(_) => Schema::Thermostat,
            DeviceState::BinarySwitch(_) => Schema::BinarySwitch,
            DeviceState::Multisensor(_) => Schema::Multisensor,
        }
    }

    pub fn resources(&self) -> Vec<Resource> {
        match *self {
            DeviceState::Lamp(ref s) => s.resources(),
            DeviceState::Thermostat(ref s) => s.resources(),
            DeviceState::BinarySwitch(ref s) => s.resources(),
            DeviceState::Multisensor(ref s) => s.resources(),
        }
    }

    pub fn resource(&self, id: &str, expand: bool) -> Result<Resource> {
        let resource = self.resources()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::NotFound(format!("resource {} on {}", id, self.schema())))?;
        Ok(if expand { resource } else { resource.collapse() })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceUpdate {
    Lamp(LampUpdate),
    Thermostat(ThermostatUpdate),
    BinarySwitch(SwitchUpdate),
}

impl DeviceUpdate {
    pub fn empty(schema: Schema) -> Result<DeviceUpdate> {
        match schema {
            Schema::Lamp => Ok(DeviceUpdate::Lamp(LampUpdate::default())),
            Schema::Thermostat => Ok(DeviceUpdate::Thermostat(ThermostatUpdate::default())),
            Schema::BinarySwitch => Ok(DeviceUpdate::BinarySwitch(SwitchUpdate::default())),
            Schema::Multisensor | Schema::Hub =>
                Err(Error::BadRequest(format!("{} has no writable resources", schema))),
        }
    }

    /// An update of a single resource. Unknown resources are not found on
    /// any schema; known but read-only ones are bad requests.
    pub fn from_resource(schema: Schema, resource_id: &str, payload: &Value) -> Result<DeviceUpdate> {
        resource::find_spec(schema.resources(), resource_id)?;
        let mut update = Self::empty(schema)?;
        update.merge(resource_id, payload)?;
        Ok(update)
    }

    /// Collects every writable resource of a posted platform into a single
    /// update. Read-only resources, and resources listed without values,
    /// are ignored so a document fetched with `get` can be edited and posted
    /// back as-is.
    pub fn from_platform(schema: Schema, platform: &Platform) -> Result<DeviceUpdate> {
        if platform.schema() != Some(schema) {
            return Err(Error::BadRequest(format!(
                "platform schema {} does not match {}", platform.opent2t.schema, schema)));
        }
        // A lamp document carries both colour resources; colourMode says
        // which one is live.
        let inactive = match schema {
            Schema::Lamp => {
                let mode = platform.find_resource("colourMode")
                    .and_then(|r| r.value("modes"))
                    .and_then(|m| m.get(0))
                    .and_then(Value::as_str);
                match mode {
                    Some("rgb") => Some("colourTemperature"),
                    Some("ct") => Some("colourRGB"),
                    _ => None,
                }
            },
            _ => None,
        };

        let mut update = Self::empty(schema)?;
        for resource in platform.resources() {
            let writable = schema.resources()
                .iter()
                .any(|spec| spec.id == resource.id && spec.writable);
            if writable && !resource.values.is_empty() && inactive != Some(resource.id.as_str()) {
                let payload = serde_json::to_value(resource)?;
                update.merge(&resource.id, &payload)?;
            }
        }
        Ok(update)
    }

    pub fn merge(&mut self, resource_id: &str, payload: &Value) -> Result<()> {
        match *self {
            DeviceUpdate::Lamp(ref mut u) => u.merge(resource_id, payload),
            DeviceUpdate::Thermostat(ref mut u) => u.merge(resource_id, payload),
            DeviceUpdate::BinarySwitch(ref mut u) => u.merge(resource_id, payload),
        }
    }

    pub fn is_empty(&self) -> bool {
        match *self {
            DeviceUpdate::Lamp(ref u) => u.is_empty(),
            DeviceUpdate::Thermostat(ref u) => u.is_empty(),
            DeviceUpdate::BinarySwitch(ref u) => u.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info() -> PlatformInfo {
        PlatformInfo {
            control_id: "42".to_owned(),
            name: "Porch".to_owned(),
            manufacturer: "Acme".to_owned(),
            model: "L1".to_owned(),
        }
    }

    fn lamp() -> DeviceState {
        DeviceState::Lamp(LampState { on: true, dim: Some(55), ..Default::default() })
    }

    #[test]
    fn platform_shape() {
        let platform = Platform::build(&info(), "opent2t-translator-com-acme-lamp", &lamp(), true);
        let value = serde_json::to_value(&platform).unwrap();
        assert_eq!(value["opent2t"]["schema"], json!("org.opent2t.sample.lamp.superpopular"));
        assert_eq!(value["opent2t"]["controlId"], json!("42"));
        assert_eq!(value["mnmn"], json!("Acme"));
        assert_eq!(value["entities"][0]["icv"], json!("core.1.1.0"));
        assert_eq!(value["entities"][0]["resources"][1]["dimmingSetting"], json!(55));
    }

    #[test]
    fn identifiers_are_stable() {
        let a = Platform::build(&info(), "t", &lamp(), true);
        let b = Platform::build(&info(), "t", &lamp(), false);
        assert_eq!(a.pi, b.pi);
        assert_eq!(a.entities[0].di, b.entities[0].di);
        assert_ne!(a.pi, a.entities[0].di);
        assert_ne!(a.pi, Platform::build(&info(), "other", &lamp(), true).pi);
    }

    #[test]
    fn collapsed_resources_have_no_values() {
        let platform = Platform::build(&info(), "t", &lamp(), false);
        assert!(platform.resources().all(|r| r.values.is_empty()));
        assert!(platform.find_resource("dim").is_some());
    }

    #[test]
    fn platform_round_trips_into_update() {
        let mut platform = Platform::build(&info(), "t", &lamp(), true);
        platform.entities[0].resources[0].values.insert("value".to_owned(), json!(false));
        let update = DeviceUpdate::from_platform(Schema::Lamp, &platform).unwrap();
        assert_eq!(update, DeviceUpdate::Lamp(LampUpdate {
            on: Some(false),
            dim: Some(55),
            ..Default::default()
        }));
    }

    #[test]
    fn colour_mode_selects_live_colour() {
        let state = DeviceState::Lamp(LampState {
            on: true,
            dim: None,
            mode: Some(ColourMode::Temperature),
            rgb: Some([255, 200, 150]),
            temperature_k: Some(2700),
        });
        let platform = Platform::build(&info(), "t", &state, true);
        match DeviceUpdate::from_platform(Schema::Lamp, &platform).unwrap() {
            DeviceUpdate::Lamp(update) => {
                assert_eq!(update.temperature_k, Some(2700));
                assert_eq!(update.rgb, None);
            },
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let platform = Platform::build(&info(), "t", &lamp(), true);
        assert!(DeviceUpdate::from_platform(Schema::Thermostat, &platform).is_err());
        assert!(DeviceUpdate::from_resource(Schema::Multisensor, "motion", &json!({})).is_err());
    }

    #[test]
    fn unknown_resources_are_not_found_on_every_schema() {
        for schema in [Schema::Lamp, Schema::Thermostat, Schema::BinarySwitch, Schema::Multisensor] {
            let err = DeviceUpdate::from_resource(schema, "nosuch", &json!({})).unwrap_err();
            assert_eq!(err.status(), 404, "{}", schema);
        }
        let err = DeviceUpdate::from_resource(Schema::Multisensor, "motion", &json!({ "value": true })).unwrap_err();
        assert_eq!(err.status(), 400);
        let err = DeviceUpdate::from_resource(Schema::Lamp, "power", &json!({ "value": "yes" })).unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn single_resource_lookup() {
        assert_eq!(lamp().resource("power", true).unwrap().value("value"), Some(&json!(true)));
        assert_eq!(lamp().resource("colourRGB", true).unwrap_err().status(), 404);
    }
}
