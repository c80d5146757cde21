//! Geocoding for the geoloc utility
//!
//! Resolves ZIP codes and "City, State" pairs through the OpenWeather
//! geocoding API, with a persistent JSON cache of past responses.

pub mod cache;
pub mod client;
pub mod error;
pub mod query;
pub mod resolver;
pub mod types;
pub mod url;

pub use cache::{cache_key_city_state, cache_key_zip, GeoCache};
pub use client::GeocodeClient;
pub use error::{CacheError, GeocodeError};
pub use query::{LocationQuery, QueryError};
pub use resolver::{Geolocate, Resolver};
pub use types::GeoLocation;
pub use url::UrlBuilder;
