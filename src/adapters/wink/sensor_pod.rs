/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::Reading;
use crate::schema::{ MultisensorState, Schema, Temperature, TemperatureUnit };
use crate::translator::TranslatorManifest;

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-wink-sensorpod",
    vendor: "wink",
    schema: Schema::Multisensor,
    resources: &["contact", "motion", "presence", "water", "temperature", "humidity", "battery"],
    writable: &[],
};

pub fn state(reading: &Reading, unit: TemperatureUnit) -> MultisensorState {
    MultisensorState {
        contact: reading.opened,
        motion: reading.motion,
        presence: reading.presence,
        water: reading.liquid_detected,
        temperature: reading.temperature.map(|c| Temperature::celsius(c).to(unit)),
        humidity: reading.humidity,
        battery: reading.battery.map(|b| (b * 100.0).round()),
    }
}
