//! Unit tests for registry client

use super::*;

use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

fn coord(key: &str) -> DependencyCoordinate {
    DependencyCoordinate::parse(key).unwrap()
}

#[test]
fn test_default_endpoints() {
    assert_eq!(RegistryEndpoint::clojars().base_url, "https://clojars.org");
    assert_eq!(RegistryEndpoint::maven_central().base_url, "https://search.maven.org");
    assert_eq!(RegistryEndpoint::clojars().name(), "Clojars");
}

#[test]
fn test_client_creation() {
    let client = RegistryClient::new().unwrap();
    assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

    let client = RegistryClient::with_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(client.timeout(), Duration::from_secs(5));
}

#[test]
fn test_clojars_query_url() {
    let url = RegistryEndpoint::clojars()
        .with_base_url("https://clojars.example/")
        .query_url(&coord("org.example/lib"))
        .unwrap();

    assert_eq!(url.path(), "/search");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("q".to_string(), "lib".to_string()),
            ("format".to_string(), "json".to_string()),
        ]
    );
}

#[test]
fn test_maven_query_url_is_encoded() {
    let url = RegistryEndpoint::maven_central()
        .query_url(&coord("org.example/lib"))
        .unwrap();

    assert_eq!(url.path(), "/solrsearch/select");
    assert!(!url.as_str().contains(' '));
    assert!(!url.as_str().contains('"'));

    let q = url
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    assert_eq!(q, "g:\"org.example\" AND a:\"lib\"");
}

#[test]
fn test_invalid_base_url() {
    let result = RegistryEndpoint::clojars()
        .with_base_url("not a url")
        .query_url(&coord("reagent"));
    assert!(matches!(result, Err(SproutError::ConfigValidation { .. })));
}

#[tokio::test]
async fn test_fetch_clojars_candidates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "reagent"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 2,
            "results": [
                { "group_name": "reagent", "jar_name": "reagent", "version": "1.2.0" },
                { "group_name": "reagent-forms", "jar_name": "reagent-forms", "version": "0.5.44" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let endpoint = RegistryEndpoint::clojars().with_base_url(mock_server.uri());

    let candidates = client.fetch_candidates(&endpoint, &coord("reagent")).await.unwrap();
    assert_eq!(candidates, vec!["1.2.0"]);
}

#[tokio::test]
async fn test_fetch_maven_candidates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/solrsearch/select"))
        .and(query_param("q", "g:\"org.example\" AND a:\"lib\""))
        .and(query_param("core", "gav"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {
                "numFound": 2,
                "docs": [
                    { "g": "org.example", "a": "lib", "v": "1.1.0" },
                    { "g": "org.example", "a": "lib", "v": "1.0.0" }
                ]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let endpoint = RegistryEndpoint::maven_central().with_base_url(mock_server.uri());

    let candidates = client.fetch_candidates(&endpoint, &coord("org.example/lib")).await.unwrap();
    assert_eq!(candidates, vec!["1.1.0", "1.0.0"]);
}

#[tokio::test]
async fn test_not_found_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let endpoint = RegistryEndpoint::clojars().with_base_url(mock_server.uri());

    let candidates = client.fetch_candidates(&endpoint, &coord("missing")).await.unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let endpoint = RegistryEndpoint::clojars().with_base_url(mock_server.uri());

    match client.fetch_candidates(&endpoint, &coord("reagent")).await {
        Err(SproutError::Network { message, .. }) => assert!(message.contains("503")),
        other => panic!("Expected Network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = RegistryClient::new().unwrap();
    let endpoint = RegistryEndpoint::maven_central().with_base_url(mock_server.uri());

    let result = client.fetch_candidates(&endpoint, &coord("org.example/lib")).await;
    assert!(matches!(result, Err(SproutError::Network { .. })));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "results": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_timeout(Duration::from_millis(200)).unwrap();
    let endpoint = RegistryEndpoint::clojars().with_base_url(mock_server.uri());

    match client.fetch_candidates(&endpoint, &coord("reagent")).await {
        Err(SproutError::Network { message, .. }) => assert!(message.contains("timed out")),
        other => panic!("Expected timeout, got {:?}", other),
    }
}
