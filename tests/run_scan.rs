//! End-to-end runs through `run_scan`.

use index_harvest::{run_scan, Config, OutputMode, TargetFamily};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn search_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "n1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_cat/indices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"index": "users", "store.size": "10mb"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_run_writes_finalized_array() {
    let server = search_server().await;
    let dir = tempfile::tempdir().unwrap();
    let targets = dir.path().join("targets.txt");
    std::fs::write(
        &targets,
        format!("# live and dead\n{}/\n\n127.0.0.1:1\n", server.uri()),
    )
    .unwrap();
    let output = dir.path().join("out.json");

    let report = run_scan(Config {
        file: targets,
        family: TargetFamily::Elasticsearch,
        output_mode: OutputMode::Json,
        output_file: output.clone(),
        threads: 2,
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(report.total_targets, 2);
    assert_eq!(report.completed, 2);
    assert_eq!(report.live, 1);

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 2);
    let live = records
        .iter()
        .find(|r| r["isInitialized"] == true)
        .unwrap();
    assert_eq!(live["rootUrl"], server.uri());
    assert_eq!(live["indices"][0]["index"], "users");
    assert!(live["indicesInfoInJson"]["users"].is_object());
}

#[tokio::test]
async fn test_run_with_store_output() {
    let server = search_server().await;
    let dir = tempfile::tempdir().unwrap();
    let targets = dir.path().join("targets.txt");
    // The same target twice lands once in the store
    std::fs::write(&targets, format!("{0}\n{0}\n", server.uri())).unwrap();
    let db_path = dir.path().join("results.db");

    let report = run_scan(Config {
        file: targets,
        family: TargetFamily::Elasticsearch,
        output_mode: OutputMode::Store,
        db_path: db_path.clone(),
        threads: 1,
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(report.completed, 2);
    assert!(db_path.exists());
    assert!(!dir.path().join("elasticsearch.json").exists());
}

#[tokio::test]
async fn test_run_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let targets = dir.path().join("targets.txt");
    std::fs::write(&targets, "1.2.3.4:9200\n").unwrap();

    let err = run_scan(Config {
        file: targets,
        threads: 0,
        output_file: dir.path().join("out.json"),
        ..Default::default()
    })
    .await
    .unwrap_err();
    assert!(format!("{:#}", err).contains("threads"));
}

#[tokio::test]
async fn test_run_with_empty_target_list() {
    let dir = tempfile::tempdir().unwrap();
    let targets = dir.path().join("targets.txt");
    std::fs::write(&targets, "# nothing yet\n").unwrap();
    let output = dir.path().join("out.json");

    let report = run_scan(Config {
        file: targets,
        output_file: output.clone(),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(report.total_targets, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
}
