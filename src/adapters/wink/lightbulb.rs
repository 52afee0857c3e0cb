/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::Reading;
use crate::color;
use crate::schema::{ ColourMode, LampState, LampUpdate, Schema };
use crate::translator::TranslatorManifest;
use serde_json::{ json, Map, Value };

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-wink-lightbulb",
    vendor: "wink",
    schema: Schema::Lamp,
    resources: &["power", "dim", "colourMode", "colourRGB", "colourTemperature"],
    writable: &["power", "dim", "colourRGB", "colourTemperature"],
};

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

pub fn state(reading: &Reading) -> LampState {
    let rgb = match (reading.hue, reading.saturation) {
        (Some(hue), Some(sat)) => Some(color::hsv_to_rgb(hue * 360.0, sat, 1.0)),
        _ => None,
    };
    let mode = match reading.color_model.as_deref() {
        Some("hsb") | Some("rgb") | Some("xy") => Some(ColourMode::Rgb),
        Some("color_temperature") => Some(ColourMode::Temperature),
        _ => None,
    };
    LampState {
        on: reading.powered.unwrap_or(false),
        dim: reading.brightness.map(|b| (b * 100.0).round().max(0.0).min(100.0) as u8),
        mode: mode,
        rgb: rgb,
        temperature_k: reading.color_temperature,
    }
}

pub fn desired_state(update: &LampUpdate) -> Value {
    let mut desired = Map::new();
    if let Some(on) = update.on {
        desired.insert("powered".to_owned(), json!(on));
    }
    if let Some(dim) = update.dim {
        desired.insert("brightness".to_owned(), json!(f64::from(dim) / 100.0));
    }
    if let Some(rgb) = update.rgb {
        let (hue, sat, _) = color::rgb_to_hsv(rgb);
        desired.insert("color_model".to_owned(), json!("hsb"));
        desired.insert("hue".to_owned(), json!(round3(hue / 360.0)));
        desired.insert("saturation".to_owned(), json!(round3(sat)));
    }
    if let Some(kelvin) = update.temperature_k {
        desired.insert("color_model".to_owned(), json!("color_temperature"));
        desired.insert("color_temperature".to_owned(), json!(kelvin));
    }
    Value::Object(desired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_hsb_bulb() {
        let reading = Reading {
            powered: Some(true),
            brightness: Some(0.42),
            hue: Some(0.0),
            saturation: Some(1.0),
            color_model: Some("hsb".to_owned()),
            color_temperature: Some(2700),
            ..Default::default()
        };
        let lamp = state(&reading);
        assert!(lamp.on);
        assert_eq!(lamp.dim, Some(42));
        assert_eq!(lamp.rgb, Some([255, 0, 0]));
        assert_eq!(lamp.mode, Some(ColourMode::Rgb));
        assert_eq!(lamp.temperature_k, Some(2700));
    }

    #[test]
    fn plain_bulb_reports_power_and_dim_only() {
        let lamp = state(&Reading { brightness: Some(1.0), ..Default::default() });
        assert!(!lamp.on);
        assert_eq!(lamp.dim, Some(100));
        assert_eq!(lamp.rgb, None);
        assert_eq!(lamp.mode, None);
    }

    #[test]
    fn builds_desired_state() {
        let desired = desired_state(&LampUpdate {
            on: Some(true),
            dim: Some(25),
            rgb: Some([0, 0, 255]),
            temperature_k: None,
        });
        assert_eq!(desired, json!({
            "powered": true,
            "brightness": 0.25,
            "color_model": "hsb",
            "hue": 0.667,
            "saturation": 1.0
        }));

        let warm = desired_state(&LampUpdate { temperature_k: Some(3000), ..Default::default() });
        assert_eq!(warm, json!({ "color_model": "color_temperature", "color_temperature": 3000 }));
    }
}
