//! HTTP access to the geocoding API.

use geoloc_core::{Config, ReqwestErrorExt};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::error::GeocodeError;

const USER_AGENT: &str = concat!("geoloc/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Client,
}

impl GeocodeClient {
    pub fn new(timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_config(config: &Config) -> Result<Self, GeocodeError> {
        Self::new(Duration::from_secs(config.request_timeout_secs))
    }

    /// GET `url` and parse the body as JSON.
    ///
    /// Anything other than 200 OK is an error carrying the status and body.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, GeocodeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| e.into_network_error())?;

        if status != StatusCode::OK {
            return Err(GeocodeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GeocodeError::Parse(e.to_string()))
    }
}
