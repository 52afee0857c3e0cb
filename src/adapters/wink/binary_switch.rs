/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::structs::Reading;
use crate::schema::{ Schema, SwitchState, SwitchUpdate };
use crate::translator::TranslatorManifest;
use serde_json::{ json, Value };

pub static MANIFEST: TranslatorManifest = TranslatorManifest {
    name: "opent2t-translator-com-wink-binaryswitch",
    vendor: "wink",
    schema: Schema::BinarySwitch,
    resources: &["power"],
    writable: &["power"],
};

pub fn state(reading: &Reading) -> SwitchState {
    SwitchState { on: reading.powered.unwrap_or(false) }
}

pub fn desired_state(update: &SwitchUpdate) -> Value {
    match update.on {
        Some(on) => json!({ "powered": on }),
        None => json!({}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_power() {
        assert!(state(&Reading { powered: Some(true), ..Default::default() }).on);
        assert!(!state(&Reading::default()).on);
        assert_eq!(desired_state(&SwitchUpdate { on: Some(false) }), json!({ "powered": false }));
    }
}
