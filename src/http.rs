/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! JSON over HTTP for vendor REST APIs.

use crate::config::ConfigStore;
use crate::error::{ Error, Result };
use log::debug;
use reqwest::{ Method, RequestBuilder };
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub enum Auth {
    None,
    Bearer(String),
    /// Raw header pairs, for vendors that want more than a bearer token.
    Headers(Vec<(String, String)>),
}

#[derive(Clone)]
pub struct VendorClient {
    vendor: &'static str,
    base_url: String,
    auth: Auth,
    client: reqwest::Client,
}

impl fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Keep credentials out of logs.
        write!(f, "VendorClient {{ vendor: {}, base_url: {} }}", self.vendor, self.base_url)
    }
}

impl VendorClient {
    pub fn new(vendor: &'static str, base_url: &str, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(VendorClient {
            vendor: vendor,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth: auth,
            client: client,
        })
    }

    /// Builds a client using the shared `http.timeout_secs` setting.
    pub fn from_config(vendor: &'static str, base_url: &str, auth: Auth, config: &ConfigStore)
        -> Result<Self>
    {
        let secs = config.get_parsed("http", "timeout_secs", DEFAULT_TIMEOUT_SECS);
        Self::new(vendor, base_url, auth, Duration::from_secs(secs))
    }

    pub fn vendor(&self) -> &'static str {
        self.vendor
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Same client and credentials against another base URL.
    pub fn with_base_url(&self, base_url: &str) -> Self {
        VendorClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            ..self.clone()
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, None).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
        where B: Serialize + ?Sized, T: DeserializeOwned
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
        where B: Serialize + ?Sized, T: DeserializeOwned
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        let _: serde_json::Value = self.send(Method::DELETE, path, None).await?;
        Ok(())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth {
            Auth::None => request,
            Auth::Bearer(ref token) => request.bearer_auth(token),
            Auth::Headers(ref headers) => {
                headers.iter().fold(request, |req, &(ref name, ref value)| {
                    req.header(name.as_str(), value.as_str())
                })
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str,
                                       body: Option<serde_json::Value>) -> Result<T> {
        let url = self.url(path);
        match body {
            Some(ref data) => debug!("{} request to {}: {} data: {}", method, self.vendor, url, data),
            None => debug!("{} request to {}: {}", method, self.vendor, url),
        }

        let mut request = self.authorize(self.client.request(method, &url));
        if let Some(ref data) = body {
            request = request.json(data);
        }
        let response = request.send().await?;
        let status = response.status();
        let content = response.text().await?;
        debug!("{} API response {}: {}", self.vendor, status, content);

        if !status.is_success() {
            return Err(Error::Vendor {
                status: status.as_u16(),
                message: if content.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_owned()
                } else {
                    content
                },
            });
        }

        if content.trim().is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{ json, Value };
    use wiremock::matchers::{ body_json, header, method, path };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    fn client(base: &str, auth: Auth) -> VendorClient {
        VendorClient::new("test", base, auth, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn joins_paths() {
        let c = client("https://api.example.com/v2/", Auth::None);
        assert_eq!(c.url("/devices"), "https://api.example.com/v2/devices");
        assert_eq!(c.url("devices/1"), "https://api.example.com/v2/devices/1");
        assert_eq!(c.url(""), "https://api.example.com/v2");
        assert_eq!(c.url("https://other.example.com/x"), "https://other.example.com/x");
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::Bearer("secret".to_owned()));
        let value: Value = c.get("devices").await.unwrap();
        assert_eq!(value["ok"], json!(true));
    }

    #[tokio::test]
    async fn sends_custom_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/thing"))
            .and(header("authentication", "APIKey k"))
            .and(body_json(json!({ "on": true })))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::Headers(vec![
            ("Authentication".to_owned(), "APIKey k".to_owned()),
        ]));
        let value: Value = c.put("thing", &json!({ "on": true })).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn slow_vendor_is_a_gateway_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let c = VendorClient::new("test", &server.uri(), Auth::None, Duration::from_millis(100)).unwrap();
        let err = c.get::<Value>("slow").await.unwrap_err();
        assert!(matches!(err, Error::Http(_)), "{:?}", err);
        assert_eq!(err.status(), 504);
    }

    #[tokio::test]
    async fn unreachable_vendor_is_a_bad_gateway() {
        let c = VendorClient::new("test", "http://127.0.0.1:9", Auth::None, Duration::from_secs(5)).unwrap();
        let err = c.get::<Value>("devices").await.unwrap_err();
        assert_eq!(err.status(), 502);
    }

    #[tokio::test]
    async fn vendor_errors_keep_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let c = client(&server.uri(), Auth::None);
        let err = c.get::<Value>("anything").await.unwrap_err();
        assert_eq!(err.status(), 401);
        assert!(err.to_string().contains("token expired"));
    }
}
