//! End-to-end resolver behaviour against a mock geocoding API.

use geoloc_core::Config;
use geoloc_geocode::{GeoLocation, Resolver};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing both endpoints at the mock server and the cache at a temp dir
fn test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::with_api_key("TEST_KEY");
    config.base_url_zip = format!("{}/geo/1.0/zip", server.uri());
    config.base_url_direct = format!("{}/geo/1.0/direct", server.uri());
    config.cache_path = dir.path().join("cache.json");
    config.request_timeout_secs = 5;
    config
}

fn beverly_hills() -> serde_json::Value {
    json!({"lat": 34.0901, "lon": -118.4065, "name": "Beverly Hills", "country": "US"})
}

fn madison() -> serde_json::Value {
    json!({"lat": 43.0731, "lon": -89.4012, "name": "Madison", "state": "Wisconsin", "country": "US"})
}

#[tokio::test]
async fn test_zip_lookup_then_cache_hit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", "90210,US"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(beverly_hills()))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    let first = resolver.dispatch("90210").await.unwrap();
    assert_eq!(first.name, "Beverly Hills");
    assert_eq!(first.lat, 34.0901);
    assert_eq!(first.lon, -118.4065);
    assert_eq!(first.country, "US");

    // Second call is served from the cache; the mock expects exactly one request
    let second = resolver.dispatch("90210").await.unwrap();
    assert_eq!(first, second);

    let stored = resolver.cache().get("zip:90210").unwrap();
    assert_eq!(stored, Some(beverly_hills()));
}

#[tokio::test]
async fn test_cache_hit_skips_network() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();
    resolver.cache().put("zip:90210", beverly_hills()).unwrap();

    let location = resolver.resolve_by_postal_code("90210").await.unwrap();
    assert_eq!(location.name, "Beverly Hills");
}

#[tokio::test]
async fn test_cache_survives_new_resolver() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([madison()])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, &dir);
    let first = Resolver::new(&config).unwrap().dispatch("Madison, WI").await;
    let second = Resolver::new(&config).unwrap().dispatch("Madison, WI").await;

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_city_state_lookup() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Madison,WI,US"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([madison()])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();
    let location = resolver.dispatch("Madison, WI").await.unwrap();

    let expected: GeoLocation = serde_json::from_value(madison()).unwrap();
    assert_eq!(location, expected);
    assert_eq!(
        resolver.cache().get("city_state:Madison, WI").unwrap(),
        Some(madison())
    );
}

#[tokio::test]
async fn test_city_state_keeps_only_first_candidate() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let other = json!({"lat": 32.0, "lon": -86.0, "name": "Madison", "state": "Alabama", "country": "US"});
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([madison(), other])))
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();
    let location = resolver.dispatch("Madison, WI").await.unwrap();

    assert_eq!(location.state.as_deref(), Some("Wisconsin"));
}

#[tokio::test]
async fn test_missing_comma_makes_no_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([madison()])))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    assert_eq!(resolver.dispatch("Madison WI").await, None);
    assert_eq!(resolver.dispatch("InvalidCity").await, None);
    assert_eq!(resolver.dispatch("").await, None);
}

#[tokio::test]
async fn test_empty_results_is_none() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Nowhere,ZZ,US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    assert_eq!(resolver.dispatch("Nowhere, ZZ").await, None);
    assert!(resolver.cache().load().unwrap().is_empty());
}

#[tokio::test]
async fn test_not_found_is_none_for_any_input() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "not found"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    assert_eq!(resolver.dispatch("00000").await, None);
    assert_eq!(resolver.dispatch("Madison, WI").await, None);
    assert!(resolver.cache().load().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_none() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"lat\": 34.09,"))
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    assert_eq!(resolver.dispatch("90210").await, None);
    assert!(!dir.path().join("cache.json").exists());
}

#[tokio::test]
async fn test_postal_code_input_never_uses_city_state_endpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([madison()])))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(beverly_hills()))
        .expect(3)
        .mount(&server)
        .await;

    let resolver = Resolver::new(&test_config(&server, &dir)).unwrap();

    for input in ["12345", " 5 3 7 0 3 ", "00501"] {
        assert!(resolver.dispatch(input).await.is_some(), "{input} should resolve");
    }
}
