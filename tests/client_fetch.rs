//! Report fetch tests.
//!
//! Uses wiremock to mock the Reporting API and test the fetch flow.

use reportingclient::{FilterParams, KeystoneToken, ReportingClient, ReportingError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn discovery_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "v1", "links": { "reports": "/v1/reports" } }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "name": "project",
                "description": "Projects",
                "lastUpdated": "2016-05-02 00:00:00",
                "links": { "self": "/v1/reports/project" }
            }
        ])))
        .mount(&server)
        .await;

    server
}

async fn client_for(server: &MockServer) -> ReportingClient<KeystoneToken> {
    let auth = KeystoneToken::authenticate("test-token", None, Some(&server.uri()))
        .await
        .unwrap();
    ReportingClient::new(auth).unwrap()
}

fn filters(pairs: &[(&str, &str)]) -> FilterParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_fetch_sends_filters_as_query() {
    let server = discovery_server().await;

    let rows = serde_json::json!([
        { "id": "p-1", "vcpus": 4 },
        { "id": "p-2", "vcpus": 8, "note": null }
    ]);

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .and(query_param("a", "1"))
        .and(query_param("b", "2"))
        .and(header("X-Auth-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&rows))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let data = client
        .fetch("project", &filters(&[("b", "2"), ("a", "1")]))
        .await
        .unwrap();

    // Decoded body comes back unchanged
    assert_eq!(serde_json::to_value(&data).unwrap(), rows);

    let requests = server.received_requests().await.unwrap();
    let fetch = requests
        .iter()
        .find(|r| r.url.path() == "/v1/reports/project")
        .unwrap();
    let mut pairs: Vec<(String, String)> = fetch.url.query_pairs().into_owned().collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string())
        ]
    );
}

#[tokio::test]
async fn test_fetch_without_filters_has_no_query() {
    let server = discovery_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let data = client.fetch("project", &FilterParams::new()).await.unwrap();
    assert!(data.is_empty());

    let requests = server.received_requests().await.unwrap();
    let fetch = requests
        .iter()
        .find(|r| r.url.path() == "/v1/reports/project")
        .unwrap();
    assert_eq!(fetch.url.query(), None);
}

#[tokio::test]
async fn test_fetch_encodes_filter_values() {
    let server = discovery_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .and(query_param("expr", "x=y & z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "ok": true }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let data = client
        .fetch("project", &filters(&[("expr", "x=y & z")]))
        .await
        .unwrap();
    assert_eq!(data.len(), 1);
}

#[tokio::test]
async fn test_fetch_unknown_report() {
    let server = discovery_server().await;

    let mut client = client_for(&server).await;
    let err = client
        .fetch("hypervisor", &FilterParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ReportingError::ReportNotFound(ref n) if n == "hypervisor"));
}

#[tokio::test]
async fn test_fetch_http_error_carries_status_and_body() {
    let server = discovery_server().await;

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden: admin only"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    let err = client
        .fetch("project", &FilterParams::new())
        .await
        .unwrap_err();

    match err {
        ReportingError::HttpError { status, ref body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "Forbidden: admin only");
        }
        ref other => panic!("Expected HttpError, got {other:?}"),
    }
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn test_fetch_reuses_discovery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "v1", "links": { "reports": "/v1/reports" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "project", "description": "", "lastUpdated": "", "links": { "self": "/v1/reports/project" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "id": 1 }])))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = client_for(&server).await;
    client.fetch("project", &FilterParams::new()).await.unwrap();
    client
        .fetch("project", &filters(&[("id", "1")]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fetch_follows_absolute_self_link() {
    let server = MockServer::start().await;
    let data_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "v1", "links": { "reports": "/v1/reports" } }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "name": "remote",
                "description": "",
                "lastUpdated": "",
                "links": { "self": format!("{}/data/remote", data_server.uri()) }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/remote"))
        .and(header("X-Auth-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "x": 1 }])))
        .expect(1)
        .mount(&data_server)
        .await;

    let mut client = client_for(&server).await;
    let data = client.fetch("remote", &FilterParams::new()).await.unwrap();
    assert_eq!(data[0]["x"], 1);
}
