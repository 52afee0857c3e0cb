/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::error::{ Error, Result };
use serde::{ Deserialize, Serialize };
use serde_json::{ Map, Value };

const IF_ACTUATOR: &str = "oic.if.a";
const IF_SENSOR: &str = "oic.if.s";
const IF_BASELINE: &str = "oic.if.baseline";

/// Interface definition of one resource of a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceSpec {
    pub id: &'static str,
    pub rt: &'static str,
    pub writable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub href: String,
    pub rt: Vec<String>,
    #[serde(rename = "if")]
    pub interfaces: Vec<String>,
    pub id: String,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Resource {
    pub fn new(spec: &ResourceSpec) -> Self {
        let primary = if spec.writable { IF_ACTUATOR } else { IF_SENSOR };
        Resource {
            href: format!("/{}", spec.id),
            rt: vec![spec.rt.to_owned()],
            interfaces: vec![primary.to_owned(), IF_BASELINE.to_owned()],
            id: spec.id.to_owned(),
            values: Map::new(),
        }
    }

    pub fn with<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.values.insert(key.to_owned(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Drops the values, leaving only the resource's identity.
    pub fn collapse(mut self) -> Self {
        self.values.clear();
        self
    }
}

pub(crate) fn find_spec<'a>(specs: &'a [ResourceSpec], id: &str) -> Result<&'a ResourceSpec> {
    specs.iter()
        .find(|s| s.id == id)
        .ok_or_else(|| Error::NotFound(format!("resource {}", id)))
}

/// Looks up a writable resource, rejecting unknown and read-only ones.
pub(crate) fn writable_spec<'a>(specs: &'a [ResourceSpec], id: &str) -> Result<&'a ResourceSpec> {
    let spec = find_spec(specs, id)?;
    if !spec.writable {
        return Err(Error::BadRequest(format!("resource {} is not writable", id)));
    }
    Ok(spec)
}

fn field<'a>(payload: &'a Value, key: &str, resource: &str) -> Result<&'a Value> {
    payload.get(key).ok_or_else(|| {
        Error::BadRequest(format!("{} requires a `{}` value", resource, key))
    })
}

pub(crate) fn bool_field(payload: &Value, key: &str, resource: &str) -> Result<bool> {
    field(payload, key, resource)?.as_bool().ok_or_else(|| {
        Error::BadRequest(format!("{}.{} must be a boolean", resource, key))
    })
}

pub(crate) fn number_field(payload: &Value, key: &str, resource: &str) -> Result<f64> {
    field(payload, key, resource)?.as_f64().ok_or_else(|| {
        Error::BadRequest(format!("{}.{} must be a number", resource, key))
    })
}

pub(crate) fn ranged_field(payload: &Value, key: &str, resource: &str, min: f64, max: f64)
    -> Result<f64>
{
    let value = number_field(payload, key, resource)?;
    if value < min || value > max {
        return Err(Error::BadRequest(
            format!("{}.{} must be within [{}, {}], got {}", resource, key, min, max, value)));
    }
    Ok(value)
}

pub(crate) fn optional_string(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// First entry of an `oic.r.mode` style `modes` array.
pub(crate) fn mode_field(payload: &Value, resource: &str) -> Result<String> {
    field(payload, "modes", resource)?
        .as_array()
        .and_then(|modes| modes.first())
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::BadRequest(format!("{}.modes must be a non-empty string array", resource)))
}

pub(crate) fn rgb_field(payload: &Value, key: &str, resource: &str) -> Result<[u8; 3]> {
    let invalid = || Error::BadRequest(format!("{}.{} must be three integers in [0, 255]", resource, key));
    let values = field(payload, key, resource)?.as_array().ok_or_else(invalid)?;
    if values.len() != 3 {
        return Err(invalid());
    }
    let mut rgb = [0u8; 3];
    for (slot, value) in rgb.iter_mut().zip(values) {
        let channel = value.as_u64().filter(|c| *c <= 255).ok_or_else(invalid)?;
        *slot = channel as u8;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POWER: ResourceSpec = ResourceSpec { id: "power", rt: "oic.r.switch.binary", writable: true };
    const MOTION: ResourceSpec = ResourceSpec { id: "motion", rt: "oic.r.sensor.motion", writable: false };

    #[test]
    fn serializes_flat() {
        let resource = Resource::new(&POWER).with("value", true);
        assert_eq!(serde_json::to_value(&resource).unwrap(), json!({
            "href": "/power",
            "rt": ["oic.r.switch.binary"],
            "if": ["oic.if.a", "oic.if.baseline"],
            "id": "power",
            "value": true
        }));
        let sensor = Resource::new(&MOTION);
        assert_eq!(sensor.interfaces[0], "oic.if.s");
    }

    #[test]
    fn deserializes_extra_keys_into_values() {
        let resource: Resource = serde_json::from_value(json!({
            "href": "/power", "rt": ["oic.r.switch.binary"], "if": ["oic.if.a"],
            "id": "power", "value": false
        })).unwrap();
        assert_eq!(resource.value("value"), Some(&json!(false)));
    }

    #[test]
    fn rejects_read_only_and_unknown() {
        let specs = [POWER, MOTION];
        assert!(writable_spec(&specs, "power").is_ok());
        assert_eq!(writable_spec(&specs, "motion").unwrap_err().status(), 400);
        assert_eq!(writable_spec(&specs, "colour").unwrap_err().status(), 404);
    }

    #[test]
    fn rgb_validation() {
        assert_eq!(rgb_field(&json!({ "rgbValue": [1, 2, 3] }), "rgbValue", "colourRGB").unwrap(), [1, 2, 3]);
        assert!(rgb_field(&json!({ "rgbValue": [1, 2] }), "rgbValue", "colourRGB").is_err());
        assert!(rgb_field(&json!({ "rgbValue": [1, 2, 256] }), "rgbValue", "colourRGB").is_err());
    }

    #[test]
    fn ranged_values() {
        let payload = json!({ "dimmingSetting": 120 });
        assert!(ranged_field(&payload, "dimmingSetting", "dim", 0.0, 100.0).is_err());
    }
}
