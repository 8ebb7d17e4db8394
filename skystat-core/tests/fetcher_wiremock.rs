//! Integration tests for the OpenWeatherMap fetcher against a mock HTTP
//! server, covering the status-code and malformed-body error mapping.

use skystat_core::{OpenWeatherFetcher, WeatherError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// Trimmed-down OpenWeatherMap current-weather payload.
fn sample_response() -> serde_json::Value {
    serde_json::json!({
        "name": "Kyiv",
        "dt": 1_754_000_000,
        "main": {
            "temp": 21.3,
            "feels_like": 20.8,
            "humidity": 56,
            "pressure": 1012
        },
        "weather": [{"description": "scattered clouds"}],
        "wind": {"speed": 3.4}
    })
}

fn fetcher_for(server: &MockServer) -> OpenWeatherFetcher {
    OpenWeatherFetcher::new("TEST_KEY")
        .expect("fetcher must build")
        .with_base_url(server.uri())
}

#[tokio::test]
async fn fetch_extracts_main_fields_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "Kyiv"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .mount(&server)
        .await;

    let record = fetcher_for(&server)
        .fetch_current_weather("Kyiv")
        .await
        .expect("fetch must succeed");

    assert_eq!(record.city, "Kyiv");
    assert_eq!(record.temp, 21.3);
    assert_eq!(record.humidity, 56.0);
    assert_eq!(record.pressure, 1012.0);
}

#[tokio::test]
async fn fetch_maps_404_to_city_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_current_weather("Nowhere")
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::WeatherData(_)));
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn fetch_maps_401_to_invalid_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_current_weather("Kyiv")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("invalid API key"));
}

#[tokio::test]
async fn fetch_reports_other_http_failures_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_current_weather("Kyiv")
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("request failed with status 500"));
    assert!(msg.contains("boom"));
}

#[tokio::test]
async fn fetch_fails_when_main_block_is_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Kyiv"})),
        )
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_current_weather("Kyiv")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("'main'"));
}

#[tokio::test]
async fn fetch_rejects_empty_city_without_a_request() {
    let server = MockServer::start().await;

    // The validation failure must short-circuit before any request is sent.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
        .expect(0)
        .mount(&server)
        .await;

    let err = fetcher_for(&server)
        .fetch_current_weather("   ")
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::InvalidInput(_)));
    server.verify().await;
}
