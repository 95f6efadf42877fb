//! Integration tests for discovery and full export runs

use hdx_exporter::adapters::rawdata::{RawDataClient, RetryPolicy};
use hdx_exporter::config::{ApiConfig, ExportTemplate, ExporterConfig};
use hdx_exporter::core::export::{Discovery, ExportOrchestrator, ExportPlan};
use hdx_exporter::core::pause::RecordingPause;
use hdx_exporter::domain::{CountryCode, ExporterError, Frequency};
use mockito::{Matcher, Server};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const SCHEDULED_PATH: &str = "/hdx/queries/scheduled/";
const SNAPSHOT_PATH: &str = "/custom/snapshot/";

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        access_token: Some(SecretString::new("test-token".to_string())),
        timeout_seconds: 5,
    }
}

fn client(server: &Server, pause: Arc<RecordingPause>) -> Arc<RawDataClient> {
    Arc::new(RawDataClient::new(&api_config(&server.url()), RetryPolicy::default(), pause).unwrap())
}

fn countries(codes: &[&str]) -> Vec<CountryCode> {
    codes.iter().map(|c| CountryCode::new(c).unwrap()).collect()
}

fn daily() -> Matcher {
    Matcher::UrlEncoded("interval".into(), "daily".into())
}

fn scheduled_body() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"iso3": "NPL"}, "geometry": null},
            {"type": "Feature", "properties": {"iso3": "BGD", "dataset_folder": "HOTOSM"}, "geometry": null}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_explicit_countries_need_no_network() {
    let mut server = Server::new_async().await;
    let scheduled = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let discovery = Discovery::new(client(&server, Arc::new(RecordingPause::new())), 3);
    let descriptors = discovery
        .discover(&countries(&["KEN", "UGA"]), None)
        .await
        .unwrap();

    let labels: Vec<String> = descriptors.iter().map(|d| d.label()).collect();
    assert_eq!(labels, vec!["KEN", "UGA"]);
    scheduled.assert_async().await;
}

#[tokio::test]
async fn test_countries_come_before_scheduled() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(daily())
        .with_status(200)
        .with_body(scheduled_body())
        .expect(1)
        .create_async()
        .await;

    let discovery = Discovery::new(client(&server, Arc::new(RecordingPause::new())), 3);
    let descriptors = discovery
        .discover(&countries(&["KEN"]), Some(&Frequency::default()))
        .await
        .unwrap();

    let labels: Vec<String> = descriptors.iter().map(|d| d.label()).collect();
    assert_eq!(labels, vec!["KEN", "NPL", "BGD,HOTOSM"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_scheduled_server_errors_exhaust_attempts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(daily())
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let discovery = Discovery::new(client(&server, Arc::new(RecordingPause::new())), 3);
    let result = discovery.discover(&[], Some(&Frequency::default())).await;

    assert!(matches!(result, Err(ExporterError::Discovery(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_scheduled_response_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(daily())
        .with_status(200)
        .with_body(r#"{"type":"FeatureCollection"}"#)
        .expect(1)
        .create_async()
        .await;

    let discovery = Discovery::new(client(&server, Arc::new(RecordingPause::new())), 3);
    let result = discovery.discover(&[], Some(&Frequency::default())).await;

    assert!(matches!(result, Err(ExporterError::Discovery(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_discovery_submits_nothing() {
    let mut server = Server::new_async().await;
    let _scheduled = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(daily())
        .with_status(503)
        .expect(3)
        .create_async()
        .await;
    let snapshot = server
        .mock("POST", SNAPSHOT_PATH)
        .expect(0)
        .create_async()
        .await;

    let pause = Arc::new(RecordingPause::new());
    let orchestrator = ExportOrchestrator::with_api(
        &ExporterConfig::default(),
        ExportTemplate::from_value(json!({})).unwrap(),
        client(&server, pause.clone()),
        pause,
    );

    let plan = ExportPlan {
        countries: countries(&["KEN"]),
        scheduled: Some(Frequency::default()),
        track: false,
    };
    let result = orchestrator.run(&plan).await;

    assert!(matches!(result, Err(ExporterError::Discovery(_))));
    snapshot.assert_async().await;
}

#[tokio::test]
async fn test_full_run_with_tracking() {
    let mut server = Server::new_async().await;
    let _scheduled = server
        .mock("GET", SCHEDULED_PATH)
        .match_query(daily())
        .with_status(200)
        .with_body(scheduled_body())
        .create_async()
        .await;
    let ken = server
        .mock("POST", SNAPSHOT_PATH)
        .match_body(Matcher::PartialJson(
            json!({"iso3": "KEN", "dataset": {"dataset_prefix": "hotosm"}}),
        ))
        .with_status(200)
        .with_body(r#"{"task_id":"t-ken"}"#)
        .expect(1)
        .create_async()
        .await;
    let npl = server
        .mock("POST", SNAPSHOT_PATH)
        .match_body(Matcher::PartialJson(json!({"iso3": "NPL"})))
        .with_status(200)
        .with_body(r#"{"task_id":"t-npl"}"#)
        .expect(1)
        .create_async()
        .await;
    let bgd = server
        .mock("POST", SNAPSHOT_PATH)
        .match_body(Matcher::PartialJson(
            json!({"iso3": "BGD", "dataset_folder": "HOTOSM"}),
        ))
        .with_status(200)
        .with_body(r#"{"task_id":"t-bgd"}"#)
        .expect(1)
        .create_async()
        .await;
    // Mocks are removed from the server when dropped
    let mut _statuses = Vec::new();
    for id in ["t-ken", "t-npl", "t-bgd"] {
        let mock = server
            .mock("GET", format!("/tasks/status/{id}/").as_str())
            .with_status(200)
            .with_body(r#"{"status":"SUCCESS","result":{"ok":true}}"#)
            .create_async()
            .await;
        _statuses.push(mock);
    }

    let temp_dir = TempDir::new().unwrap();
    let result_path = temp_dir.path().join("result.json");

    let pause = Arc::new(RecordingPause::new());
    let template = ExportTemplate::from_value(json!({
        "iso3": null,
        "dataset": {"dataset_prefix": "hotosm"}
    }))
    .unwrap();
    let orchestrator = ExportOrchestrator::with_api(
        &ExporterConfig::default(),
        template,
        client(&server, pause.clone()),
        pause,
    )
    .with_result_path(&result_path);

    let plan = ExportPlan::countries(countries(&["KEN"])).with_tracking(true);
    let plan = ExportPlan {
        scheduled: Some(Frequency::default()),
        ..plan
    };
    let summary = orchestrator.run(&plan).await.unwrap();

    let ids: Vec<&str> = summary.task_ids.iter().map(|t| t.as_str()).collect();
    assert_eq!(ids, vec!["t-ken", "t-npl", "t-bgd"]);
    assert_eq!(summary.total_exports, 3);
    assert!(summary.is_successful());
    assert!(result_path.exists());

    ken.assert_async().await;
    npl.assert_async().await;
    bgd.assert_async().await;
}

#[tokio::test]
async fn test_trigger_returns_task_ids_without_polling() {
    let mut server = Server::new_async().await;
    let kenya = server
        .mock("POST", SNAPSHOT_PATH)
        .match_body(Matcher::PartialJson(json!({"iso3": "KEN"})))
        .with_status(200)
        .with_body(r#"{"task_id":"t-ken"}"#)
        .expect(1)
        .create_async()
        .await;
    let uganda = server
        .mock("POST", SNAPSHOT_PATH)
        .match_body(Matcher::PartialJson(json!({"iso3": "UGA"})))
        .with_status(200)
        .with_body(r#"{"task_id":"t-uga"}"#)
        .expect(1)
        .create_async()
        .await;
    let status = server
        .mock("GET", Matcher::Regex(r"^/tasks/status/".to_string()))
        .expect(0)
        .create_async()
        .await;

    let pause = Arc::new(RecordingPause::new());
    let orchestrator = ExportOrchestrator::with_api(
        &ExporterConfig::default(),
        ExportTemplate::from_value(json!({"iso3": null})).unwrap(),
        client(&server, pause.clone()),
        pause,
    );

    let task_ids = orchestrator
        .trigger(&ExportPlan::countries(countries(&["KEN", "UGA"])))
        .await
        .unwrap();

    let ids: Vec<&str> = task_ids.iter().map(|t| t.as_str()).collect();
    assert_eq!(ids, vec!["t-ken", "t-uga"]);
    kenya.assert_async().await;
    uganda.assert_async().await;
    status.assert_async().await;
}
