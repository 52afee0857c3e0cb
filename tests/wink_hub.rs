/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde_json::{ json, Value };
use translators::adapters::wink::api::WinkApi;
use translators::adapters::wink::Hub;
use translators::config::ConfigStore;
use translators::translator::HubTranslator;
use wiremock::matchers::{ body_json, header, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

fn bulb() -> Value {
    json!({
        "object_type": "light_bulb", "object_id": "1", "name": "Porch",
        "model_name": "A19", "device_manufacturer": "ge",
        "last_reading": { "connection": true, "powered": true, "brightness": 0.75 }
    })
}

fn switch() -> Value {
    json!({
        "object_type": "binary_switch", "object_id": "2", "name": "Heater",
        "last_reading": { "connection": true, "powered": true }
    })
}

fn thermostat() -> Value {
    json!({
        "object_type": "thermostat", "object_id": "4", "name": "Hall",
        "last_reading": {
            "powered": true, "mode": "heat_only", "modes_allowed": ["auto", "heat_only", "cool_only"],
            "temperature": 19.5, "min_set_point": 20.0, "max_set_point": 24.0,
            "users_away": false, "fan_mode": "auto"
        }
    })
}

async fn account() -> (MockServer, Hub) {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/users/me/wink_devices"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                bulb(),
                switch(),
                { "object_type": "hub", "object_id": "3", "name": "Wink Hub" },
                thermostat(),
            ]
        })))
        .mount(&server).await;
    for (collection, device) in [("light_bulbs/1", bulb()), ("binary_switches/2", switch()),
                                 ("thermostats/4", thermostat())] {
        Mock::given(method("GET")).and(path(format!("/{}", collection)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": device })))
            .mount(&server).await;
    }

    let config = ConfigStore::in_memory();
    let api = WinkApi::new(&server.uri(), "token", &config).unwrap();
    (server, Hub::new(api, &config))
}

#[tokio::test]
async fn lists_supported_devices() {
    let (_server, hub) = account().await;
    let response = hub.get_platforms(true).await.unwrap();

    assert!(response.errors.is_empty());
    let translators: Vec<_> = response.platforms.iter().map(|p| p.opent2t.translator.as_str()).collect();
    assert_eq!(translators, vec![
        "opent2t-translator-com-wink-lightbulb",
        "opent2t-translator-com-wink-binaryswitch",
        "opent2t-translator-com-wink-thermostat",
    ]);

    let bulb = &response.platforms[0];
    assert_eq!(bulb.mnmn, "ge");
    assert_eq!(bulb.find_resource("dim").unwrap().value("dimmingSetting"), Some(&json!(75)));

    let thermostat = &response.platforms[2];
    assert_eq!(thermostat.find_resource("targetTemperature").unwrap().value("temperature"), Some(&json!(20.0)));
    assert_eq!(thermostat.find_resource("hvacMode").unwrap().value("modes"), Some(&json!(["heatOnly"])));
}

#[tokio::test]
async fn switching_off_sends_desired_state() {
    let (server, hub) = account().await;
    Mock::given(method("PUT")).and(path("/binary_switches/2/desired_state"))
        .and(body_json(json!({ "desired_state": { "powered": false } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": switch() })))
        .expect(1)
        .mount(&server).await;

    let resource = hub.post_resource("binary_switch/2", "power", &json!({ "value": false })).await.unwrap();
    assert_eq!(resource.id, "power");
}

#[tokio::test]
async fn target_temperature_moves_the_heating_set_point() {
    let (server, hub) = account().await;
    Mock::given(method("PUT")).and(path("/thermostats/4/desired_state"))
        .and(body_json(json!({ "desired_state": { "min_set_point": 21.0 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": thermostat() })))
        .expect(1)
        .mount(&server).await;

    hub.post_resource("thermostat/4", "targetTemperature", &json!({ "temperature": 21, "units": "C" })).await.unwrap();
}

#[tokio::test]
async fn unsupported_mode_is_rejected_before_any_write() {
    let (server, hub) = account().await;
    Mock::given(method("PUT")).and(path("/thermostats/4/desired_state"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server).await;

    let err = hub.post_resource("thermostat/4", "hvacMode", &json!({ "modes": ["eco"] })).await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn subscriptions_round_trip() {
    let (server, hub) = account().await;
    Mock::given(method("POST")).and(path("/light_bulbs/1/subscriptions"))
        .and(body_json(json!({ "callback": "https://example.com/notify", "secret": "s3cret" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "subscription_id": "sub-1", "expires_at": 1700000000 }
        })))
        .expect(1)
        .mount(&server).await;
    Mock::given(method("DELETE")).and(path("/subscriptions/sub-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server).await;

    let subscription = hub.subscribe("light_bulb/1", "https://example.com/notify", Some("s3cret")).await.unwrap();
    assert_eq!(subscription.id, "sub-1");
    assert_eq!(subscription.control_id, "light_bulb/1");
    assert_eq!(subscription.expires_at.unwrap().timestamp(), 1700000000);

    hub.unsubscribe("light_bulb/1", "sub-1").await.unwrap();
}

#[tokio::test]
async fn subscribing_to_an_unknown_device_fails() {
    let (_server, hub) = account().await;
    assert_eq!(hub.subscribe("light_bulb/99", "https://example.com/notify", None).await.unwrap_err().status(), 404);
    // Right id, wrong type.
    assert_eq!(hub.subscribe("thermostat/1", "https://example.com/notify", None).await.unwrap_err().status(), 404);
    assert_eq!(hub.subscribe("1", "https://example.com/notify", None).await.unwrap_err().status(), 404);
}

#[tokio::test]
async fn devices_of_different_types_may_share_an_object_id() {
    let server = MockServer::start().await;
    let mut other_switch = switch();
    other_switch["object_id"] = json!("1");
    Mock::given(method("GET")).and(path("/users/me/wink_devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [bulb(), other_switch.clone()] })))
        .mount(&server).await;
    Mock::given(method("GET")).and(path("/light_bulbs/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": bulb() })))
        .mount(&server).await;
    Mock::given(method("GET")).and(path("/binary_switches/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": other_switch.clone() })))
        .mount(&server).await;
    Mock::given(method("PUT")).and(path("/binary_switches/1/desired_state"))
        .and(body_json(json!({ "desired_state": { "powered": false } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": other_switch })))
        .expect(1)
        .mount(&server).await;
    Mock::given(method("PUT")).and(path("/light_bulbs/1/desired_state"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server).await;

    let config = ConfigStore::in_memory();
    let hub = Hub::new(WinkApi::new(&server.uri(), "token", &config).unwrap(), &config);
    let response = hub.get_platforms(true).await.unwrap();
    let listed: Vec<_> = response.platforms.iter()
        .map(|p| (p.opent2t.control_id.as_str(), p.opent2t.translator.as_str(), p.n.as_str()))
        .collect();
    assert_eq!(listed, vec![
        ("light_bulb/1", "opent2t-translator-com-wink-lightbulb", "Porch"),
        ("binary_switch/1", "opent2t-translator-com-wink-binaryswitch", "Heater"),
    ]);

    assert_eq!(hub.get_platform("binary_switch/1", false).await.unwrap().n, "Heater");
    hub.post_resource("binary_switch/1", "power", &json!({ "value": false })).await.unwrap();
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).and(path("/users/me/wink_devices"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"errors\":[\"invalid token\"]}"))
        .mount(&server).await;

    let config = ConfigStore::in_memory();
    let hub = Hub::new(WinkApi::new(&server.uri(), "stale", &config).unwrap(), &config);
    assert_eq!(hub.get_platforms(false).await.unwrap_err().status(), 401);
}
