//! Location resolution: classify, check the cache, fetch, write back.
//!
//! The public operations never fail. Every error is logged with the input
//! that caused it and reported to the caller as `None`.

use geoloc_core::Config;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::{Instrument, Span};

use crate::cache::{cache_key_city_state, cache_key_zip, GeoCache};
use crate::client::GeocodeClient;
use crate::error::GeocodeError;
use crate::query::{normalize_postal_code, split_city_state, LocationQuery};
use crate::types::GeoLocation;
use crate::url::UrlBuilder;

/// The interface front ends use to turn one line of input into a result.
pub trait Geolocate {
    fn geolocate(&self, location: &str) -> impl Future<Output = Option<GeoLocation>>;
}

pub struct Resolver {
    client: GeocodeClient,
    urls: UrlBuilder,
    cache: GeoCache,
    span: Span,
}

impl Resolver {
    pub fn new(config: &Config) -> Result<Self, GeocodeError> {
        Ok(Self::with_parts(
            GeocodeClient::from_config(config)?,
            UrlBuilder::from_config(config),
            GeoCache::new(config.cache_path.clone()),
        ))
    }

    pub fn with_parts(client: GeocodeClient, urls: UrlBuilder, cache: GeoCache) -> Self {
        let span = tracing::info_span!("resolver", cache = %cache.path().display());
        Self {
            client,
            urls,
            cache,
            span,
        }
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }

    /// Resolve free-form input: postal code if it is all digits once spaces
    /// are removed, otherwise "City, State".
    pub async fn dispatch(&self, location: &str) -> Option<GeoLocation> {
        let result = match LocationQuery::classify(location) {
            Ok(query) => self.lookup(query).await,
            Err(e) => Err(e.into()),
        };
        self.report(location, result)
    }

    pub async fn resolve_by_postal_code(&self, code: &str) -> Option<GeoLocation> {
        let result = match normalize_postal_code(code) {
            Ok(code) => self.lookup(LocationQuery::PostalCode(code)).await,
            Err(e) => Err(e.into()),
        };
        self.report(code, result)
    }

    pub async fn resolve_by_city_state(&self, input: &str) -> Option<GeoLocation> {
        let result = match split_city_state(input) {
            Ok((city, state)) => {
                let query = LocationQuery::CityState {
                    raw: input.to_string(),
                    city,
                    state,
                };
                self.lookup(query).await
            }
            Err(e) => Err(e.into()),
        };
        self.report(input, result)
    }

    async fn lookup(&self, query: LocationQuery) -> Result<GeoLocation, GeocodeError> {
        let span = self.span.clone();
        match query {
            LocationQuery::PostalCode(code) => {
                self.lookup_postal_code(&code).instrument(span).await
            }
            LocationQuery::CityState { raw, city, state } => {
                self.lookup_city_state(&raw, &city, &state)
                    .instrument(span)
                    .await
            }
        }
    }

    async fn lookup_postal_code(&self, code: &str) -> Result<GeoLocation, GeocodeError> {
        tracing::info!("Fetching geolocation for ZIP code: {}", code);

        let key = cache_key_zip(code);
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let url = self.urls.zip_url(code);
        let redacted = self.urls.redact(&url);
        tracing::debug!("Request URL: {}", redacted);

        self.fetch_postal_code(code, &key, &url)
            .await
            .map_err(|e| e.with_url(redacted))
    }

    async fn fetch_postal_code(
        &self,
        code: &str,
        key: &str,
        url: &str,
    ) -> Result<GeoLocation, GeocodeError> {
        let value = self.client.fetch_json(url).await?;
        tracing::debug!("Response JSON for {}: {}", code, value);

        let location = parse_location(&value)?;
        self.store(key, value);
        Ok(location)
    }

    async fn lookup_city_state(
        &self,
        raw: &str,
        city: &str,
        state: &str,
    ) -> Result<GeoLocation, GeocodeError> {
        tracing::info!("Fetching geolocation for city/state: {}", raw);

        let key = cache_key_city_state(raw);
        if let Some(hit) = self.cached(&key) {
            return Ok(hit);
        }

        let url = self.urls.direct_url(city, state);
        let redacted = self.urls.redact(&url);
        tracing::debug!("Request URL: {}", redacted);

        self.fetch_city_state(raw, &key, &url)
            .await
            .map_err(|e| e.with_url(redacted))
    }

    async fn fetch_city_state(
        &self,
        raw: &str,
        key: &str,
        url: &str,
    ) -> Result<GeoLocation, GeocodeError> {
        let value = self.client.fetch_json(url).await?;
        tracing::debug!("Response JSON for {}: {}", raw, value);

        let first = match value {
            Value::Array(candidates) => candidates
                .into_iter()
                .next()
                .ok_or_else(|| GeocodeError::NoResults(raw.to_string()))?,
            other => {
                return Err(GeocodeError::Parse(format!(
                    "expected a JSON array, got {}",
                    other
                )))
            }
        };

        let location = parse_location(&first)?;
        self.store(key, first);
        Ok(location)
    }

    /// Cache lookup. Read failures and unreadable entries count as misses.
    fn cached(&self, key: &str) -> Option<GeoLocation> {
        match self.cache.get(key) {
            Ok(Some(value)) => match parse_location(&value) {
                Ok(location) => {
                    tracing::debug!("Cache hit for {}", key);
                    Some(location)
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss for {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Write-back. A failed write is logged; the fetched result is still used.
    fn store(&self, key: &str, value: Value) {
        if let Err(e) = self.cache.put(key, value) {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    fn report(
        &self,
        input: &str,
        result: Result<GeoLocation, GeocodeError>,
    ) -> Option<GeoLocation> {
        let _entered = self.span.enter();
        match result {
            Ok(location) => Some(location),
            Err(e) if e.is_local() => {
                tracing::error!("Invalid location {:?}: {}", input, e);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching data for {:?}: {}", input, e);
                None
            }
        }
    }
}

impl Geolocate for Resolver {
    async fn geolocate(&self, location: &str) -> Option<GeoLocation> {
        self.dispatch(location).await
    }
}

fn parse_location(value: &Value) -> Result<GeoLocation, GeocodeError> {
    GeoLocation::deserialize(value).map_err(|e| GeocodeError::Parse(e.to_string()))
}
