/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde_json::{ json, Value };
use translators::adapters::smartthings::api::SmartThingsApi;
use translators::adapters::smartthings::Hub;
use translators::config::ConfigStore;
use translators::translator::HubTranslator;
use wiremock::matchers::{ body_json, header, method, path, query_param };
use wiremock::{ Mock, MockServer, ResponseTemplate };

fn light() -> Value {
    json!({
        "id": "l1", "name": "Hue Lamp", "label": "Reading lamp", "deviceType": "light",
        "manufacturer": "Philips", "model": "LCT001",
        "attributes": { "switch": "on", "level": 60, "hue": 50, "saturation": 100, "colorMode": "hs" }
    })
}

fn thermostat() -> Value {
    json!({
        "id": "t1", "name": "Ecobee", "deviceType": "thermostat",
        "attributes": {
            "temperature": 68, "heatingSetpoint": 66, "coolingSetpoint": 76,
            "thermostatMode": "heat", "supportedThermostatModes": ["auto", "heat", "cool", "off"],
            "thermostatFanMode": "auto"
        }
    })
}

async fn account() -> (MockServer, Hub) {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/endpoints"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "uri": format!("{}/app/abc", server.uri()) }
        ])))
        .expect(1)
        .mount(&server).await;
    Mock::given(method("GET")).and(path("/app/abc/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            light(),
            thermostat(),
            { "id": "x1", "name": "Doorbell", "deviceType": "doorbell", "attributes": {} },
        ])))
        .mount(&server).await;
    Mock::given(method("GET")).and(path("/app/abc/devices/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(light()))
        .mount(&server).await;
    Mock::given(method("GET")).and(path("/app/abc/devices/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thermostat()))
        .mount(&server).await;

    let config = ConfigStore::in_memory();
    let api = SmartThingsApi::new(&format!("{}/endpoints", server.uri()), "token", &config).unwrap();
    (server, Hub::new(api, &config))
}

#[tokio::test]
async fn discovers_endpoint_once_and_lists_devices() {
    let (_server, hub) = account().await;
    let response = hub.get_platforms(true).await.unwrap();
    let again = hub.get_platforms(false).await.unwrap();

    assert!(response.errors.is_empty());
    assert_eq!(again.platforms.len(), 2);
    let translators: Vec<_> = response.platforms.iter().map(|p| p.opent2t.translator.as_str()).collect();
    assert_eq!(translators, vec![
        "opent2t-translator-com-smartthings-lightbulb",
        "opent2t-translator-com-smartthings-thermostat",
    ]);

    let lamp = &response.platforms[0];
    assert_eq!(lamp.find_resource("dim").unwrap().value("dimmingSetting"), Some(&json!(60)));

    // Scale defaults to Fahrenheit.
    let thermostat = &response.platforms[1];
    let target = thermostat.find_resource("targetTemperature").unwrap();
    assert_eq!(target.value("temperature"), Some(&json!(66.0)));
    assert_eq!(target.value("units"), Some(&json!("F")));
}

#[tokio::test]
async fn missing_endpoint_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/endpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server).await;

    let config = ConfigStore::in_memory();
    let api = SmartThingsApi::new(&format!("{}/endpoints", server.uri()), "token", &config).unwrap();
    let hub = Hub::new(api, &config);
    assert_eq!(hub.get_platforms(false).await.unwrap_err().status(), 404);
}

#[tokio::test]
async fn dimming_puts_level() {
    let (server, hub) = account().await;
    Mock::given(method("PUT")).and(path("/app/abc/devices/l1"))
        .and(body_json(json!({ "level": 30 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server).await;

    hub.post_resource("l1", "dim", &json!({ "dimmingSetting": 30 })).await.unwrap();
}

#[tokio::test]
async fn target_temperature_follows_heat_mode() {
    let (server, hub) = account().await;
    Mock::given(method("PUT")).and(path("/app/abc/devices/t1"))
        .and(body_json(json!({ "heatingSetpoint": 68.0 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server).await;

    hub.post_resource("t1", "targetTemperature", &json!({ "temperature": 20, "units": "C" })).await.unwrap();
}

#[tokio::test]
async fn away_mode_is_not_implemented() {
    let (_server, hub) = account().await;
    let err = hub.post_resource("t1", "awayMode", &json!({ "modes": ["away"] })).await.unwrap_err();
    assert_eq!(err.status(), 501);
}

#[tokio::test]
async fn subscription_is_keyed_by_callback() {
    let (server, hub) = account().await;
    Mock::given(method("POST")).and(path("/app/abc/subscription/l1"))
        .and(body_json(json!({ "subscriptionUrl": "https://example.com/cb" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server).await;
    Mock::given(method("DELETE")).and(path("/app/abc/subscription/l1"))
        .and(query_param("subscriptionUrl", "https://example.com/cb"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server).await;

    let subscription = hub.subscribe("l1", "https://example.com/cb", None).await.unwrap();
    assert_eq!(subscription.id, "https://example.com/cb");
    assert!(subscription.expires_at.is_none());
    hub.unsubscribe("l1", &subscription.id).await.unwrap();
}
