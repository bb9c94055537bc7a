//! End-to-end tests for the CLI run flow.
//!
//! Uses wiremock for the Reporting API and a bare token with an explicit
//! endpoint, so no identity service is involved. Every identity flag is
//! given on the command line so exported `OS_*` variables cannot leak in.

use clap::Parser;
use reportingclient::cli::{run, Cli, RunOutcome};
use reportingclient::ReportingError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn reporting_server(rows: serde_json::Value) -> MockServer {
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

    Mock::given(method("GET"))
        .and(path("/v1/reports/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rows))
        .mount(&server)
        .await;

    server
}

/// Blank values for every identity flag that falls back to the environment.
const NO_ENV_AUTH: &[&str] = &[
    "--os-auth-url",
    "",
    "--os-username",
    "",
    "--os-password",
    "",
    "--os-project-name",
    "",
    "--os-tenant-name",
    "",
    "--os-user-domain-name",
    "",
    "--os-project-domain-name",
    "",
];

fn cli(endpoint: &str, extra: &[&str]) -> Cli {
    let mut args = vec![
        "reporting-client",
        "--os-token",
        "test-token",
        "--endpoint",
        endpoint,
    ];
    args.extend_from_slice(NO_ENV_AUTH);
    args.extend_from_slice(extra);
    Cli::parse_from(args)
}

#[tokio::test]
async fn test_csv_to_outfile_round_trips() {
    let server = reporting_server(serde_json::json!([
        { "name": "Alpha, Inc.", "id": "p-1", "vcpus": 4 },
        { "name": "Beta", "id": "p-2", "vcpus": 8 }
    ]))
    .await;
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("report.csv");

    let cli = cli(
        &server.uri(),
        &["--report", "project", "-o", outfile.to_str().unwrap()],
    );
    assert_eq!(run(cli).await.unwrap(), RunOutcome::Written(2));

    let mut reader = csv::Reader::from_path(&outfile).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["id", "name", "vcpus"]);

    let records: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(
        records,
        vec![
            vec!["p-1", "Alpha, Inc.", "4"],
            vec!["p-2", "Beta", "8"]
        ]
    );
}

#[tokio::test]
async fn test_json_to_outfile() {
    let rows = serde_json::json!([{ "id": "p-1", "vcpus": 4 }]);
    let server = reporting_server(rows.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("report.json");

    let cli = cli(
        &server.uri(),
        &["--report", "project", "--format", "Json", "-o", outfile.to_str().unwrap()],
    );
    assert_eq!(run(cli).await.unwrap(), RunOutcome::Written(1));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outfile).unwrap()).unwrap();
    assert_eq!(written, rows);
}

#[tokio::test]
async fn test_empty_result_set_writes_nothing() {
    let server = reporting_server(serde_json::json!([])).await;
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("report.csv");

    let cli = cli(
        &server.uri(),
        &["--report", "project", "-o", outfile.to_str().unwrap()],
    );
    assert_eq!(run(cli).await.unwrap(), RunOutcome::EmptyResultSet);

    assert!(!outfile.exists());
}

#[tokio::test]
async fn test_unknown_format_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("report.xml");

    let cli = cli(
        &server.uri(),
        &["--report", "project", "--format", "xml", "-o", outfile.to_str().unwrap()],
    );
    let err = run(cli).await.unwrap_err();

    assert!(matches!(err, ReportingError::UnknownFormat(ref f) if f == "xml"));
    assert!(err.to_string().contains("Unknown output format"));
    assert!(!outfile.exists());
}

#[tokio::test]
async fn test_list_reports_succeeds() {
    let server = reporting_server(serde_json::json!([])).await;

    let cli = cli(&server.uri(), &["--list-reports"]);
    assert_eq!(run(cli).await.unwrap(), RunOutcome::Listed(1));
}

#[tokio::test]
async fn test_unknown_report_fails() {
    let server = reporting_server(serde_json::json!([])).await;

    let cli = cli(&server.uri(), &["--report", "hypervisor"]);
    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, ReportingError::ReportNotFound(_)));
}

#[tokio::test]
async fn test_missing_credentials_fail() {
    let cli = Cli::parse_from([
        "reporting-client",
        "--report",
        "project",
        "--os-token",
        "",
        "--os-auth-url",
        "",
        "--os-username",
        "",
        "--os-password",
        "",
        "--os-project-name",
        "",
        "--os-tenant-name",
        "",
    ]);
    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, ReportingError::InvalidCredential(_)));
}
