//! Fixture infrastructure for E2E tests
//!
//! Loads VCR cassettes holding recorded NuGet and GameBanana responses and
//! replays them through a mockito server. Absolute URLs inside recorded
//! bodies are written as `{{server}}` and rewritten to the mock server.

use anyhow::{Context, Result};
use mockito::{Matcher, Mock, ServerGuard};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::path::PathBuf;

/// Placeholder for the mock server origin inside cassette bodies
pub const SERVER_PLACEHOLDER: &str = "{{server}}";

/// VCR cassette structure matching our recorded HTTP interactions
#[derive(Debug, Deserialize)]
pub struct VcrCassette {
    pub name: String,
    pub request: VcrRequest,
    pub response: VcrResponse,
}

#[derive(Debug, Deserialize)]
pub struct VcrRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub headers: Value,
}

#[derive(Debug, Deserialize)]
pub struct VcrResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: Value,
    pub body: Value,
}

impl VcrRequest {
    /// Path component of the recorded URL
    pub fn path(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map_or(self.url.as_str(), |(_, rest)| rest);
        without_scheme
            .find('/')
            .map_or("/", |index| &without_scheme[index..])
    }
}

/// Absolute path of a cassette under `fixtures/cassettes`
pub fn cassette_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("cassettes")
        .join(relative)
}

/// Load and parse a cassette
pub fn load_cassette(relative: &str) -> Result<VcrCassette> {
    let path = cassette_path(relative);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to load VCR cassette '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse VCR cassette '{}'", path.display()))
}

/// Load a cassette's response body as a typed value, with `{{server}}` left as is
pub fn load_vcr_response<T>(relative: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let cassette = load_cassette(relative)?;
    serde_json::from_value(cassette.response.body)
        .with_context(|| format!("Failed to deserialize response body from '{relative}'"))
}

/// Response body as a JSON string with the placeholder rewritten to `server_url`
pub fn load_vcr_body_string(relative: &str, server_url: &str) -> Result<String> {
    let cassette = load_cassette(relative)?;
    let body = serde_json::to_string(&cassette.response.body)
        .with_context(|| format!("Failed to serialize response body from '{relative}'"))?;
    Ok(body.replace(SERVER_PLACEHOLDER, server_url))
}

/// Register a cassette on `server`, matching its method and path with any query
pub async fn mount_cassette(server: &mut ServerGuard, relative: &str) -> Result<Mock> {
    let cassette = load_cassette(relative)?;
    let body = load_vcr_body_string(relative, &server.url())?;

    let mut mock = server
        .mock(cassette.request.method.as_str(), cassette.request.path())
        .match_query(Matcher::Any)
        .with_status(cassette.response.status as usize)
        .with_body(body);

    if let Some(headers) = cassette.response.headers.as_object() {
        for (name, value) in headers {
            if let Some(value) = value.as_str() {
                mock = mock.with_header(name.as_str(), value);
            }
        }
    }

    Ok(mock.create_async().await)
}

/// Serve `bytes` for an image path referenced by a cassette
pub async fn mount_image(server: &mut ServerGuard, path: &str, bytes: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_body(bytes)
        .create_async()
        .await
}
