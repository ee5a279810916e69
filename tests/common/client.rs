//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and adds the credential and format parameters every
//! protocol call needs. When API routes change, update only this file.

#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl TestClient {
    fn build(base_url: String, username: Option<&str>, password: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    /// A client that sends no credentials
    pub fn new(base_url: String) -> Self {
        Self::build(base_url, None, None)
    }

    /// A client sending the test user's plain password
    pub fn authenticated(base_url: String) -> Self {
        Self::build(base_url, Some(TEST_USER), Some(TEST_PASS))
    }

    pub fn with_credentials(base_url: String, username: &str, password: &str) -> Self {
        Self::build(base_url, Some(username), Some(password))
    }

    fn url(&self, view: &str) -> String {
        format!("{}/rest/{}.view", self.base_url, view)
    }

    fn query(&self, params: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(username) = &self.username {
            query.push(("u".to_string(), username.clone()));
        }
        if let Some(password) = &self.password {
            query.push(("p".to_string(), password.clone()));
        }
        query.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        query
    }

    // ========================================================================
    // Raw calls
    // ========================================================================

    /// GET of a protocol operation, XML unless `params` say otherwise
    pub async fn get(&self, view: &str, params: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url(view))
            .query(&self.query(params))
            .send()
            .await
            .expect("Request failed")
    }

    /// Same as `get` with additional request headers
    pub async fn get_with_headers(
        &self,
        view: &str,
        params: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Response {
        let mut request = self.client.get(self.url(view)).query(&self.query(params));
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        request.send().await.expect("Request failed")
    }

    pub async fn post(&self, view: &str, params: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(view))
            .query(&self.query(params))
            .send()
            .await
            .expect("Request failed")
    }

    // ========================================================================
    // Protocol documents
    // ========================================================================

    /// Calls an operation with `f=json` and returns the inner
    /// `subsonic-response` object
    pub async fn get_json(&self, view: &str, params: &[(&str, &str)]) -> Value {
        let mut all_params = vec![("f", "json")];
        all_params.extend_from_slice(params);
        let response = self.get(view, &all_params).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/json"
        );
        let mut document: Value = response.json().await.expect("Invalid JSON");
        document["subsonic-response"].take()
    }

    /// Calls an operation in XML and returns the document text
    pub async fn get_xml(&self, view: &str, params: &[(&str, &str)]) -> String {
        let response = self.get(view, params).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/xml"
        );
        response.text().await.expect("Invalid body")
    }

    // ========================================================================
    // Binaries
    // ========================================================================

    pub async fn get_cover_art(&self, id: &str) -> Response {
        self.get("getCoverArt", &[("id", id)]).await
    }

    pub async fn stream(&self, id: &str) -> Response {
        self.get("stream", &[("id", id)]).await
    }

    pub async fn stream_range(&self, id: &str, range: &str) -> Response {
        self.get_with_headers("stream", &[("id", id)], &[("Range", range)])
            .await
    }

    pub async fn download(&self, id: &str) -> Response {
        self.get("download", &[("id", id)]).await
    }
}
