use super::*;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

const PROJECT: &str = "/v1/projects/test-project";
const RULES: &str = "rules_version = '2';\nservice cloud.firestore {\n  match /databases/{database}/documents {\n    match /{document=**} { allow read: if request.auth != null; }\n  }\n}\n";

fn rules_client(server: &MockServer) -> FirebaseRules {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseRules::new_with_client(client, server.url(PROJECT), "test-project")
}

fn write_rules(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("firestore.rules");
    std::fs::write(&path, RULES).unwrap();
    path
}

fn mock_create_ruleset(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path(format!("{}/rulesets", PROJECT))
            .json_body(json!({
                "source": {
                    "files": [{ "content": RULES, "name": "firestore.rules" }]
                }
            }));
        then.status(200).json_body(json!({
            "name": "projects/test-project/rulesets/abc-123",
            "createTime": "2024-01-01T00:00:00Z"
        }));
    })
}

#[tokio::test]
async fn test_deploy_updates_existing_release() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(&dir);

    let create = mock_create_ruleset(&server);
    let update = server.mock(|when, then| {
        when.method(PATCH)
            .path(format!("{}/releases/cloud.firestore", PROJECT))
            .json_body(json!({
                "name": "projects/test-project/releases/cloud.firestore",
                "rulesetName": "projects/test-project/rulesets/abc-123"
            }));
        then.status(200).json_body(json!({
            "name": "projects/test-project/releases/cloud.firestore",
            "rulesetName": "projects/test-project/rulesets/abc-123"
        }));
    });
    let create_release = server.mock(|when, then| {
        when.method(POST).path(format!("{}/releases", PROJECT));
        then.status(200).json_body(json!({}));
    });

    let report = rules.deploy_firestore_rules(&path).await.unwrap();

    create.assert();
    update.assert();
    create_release.assert_calls(0);
    assert_eq!(
        report,
        DeployReport {
            ruleset_name: "projects/test-project/rulesets/abc-123".to_string(),
            release: ReleaseMode::Updated,
        }
    );
}

#[tokio::test]
async fn test_deploy_creates_release_when_update_fails() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(&dir);

    mock_create_ruleset(&server);
    let update = server.mock(|when, then| {
        when.method(PATCH)
            .path(format!("{}/releases/cloud.firestore", PROJECT));
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "Release not found", "status": "NOT_FOUND" }
        }));
    });
    let create_release = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{}/releases", PROJECT))
            .body_includes("projects/test-project/rulesets/abc-123");
        then.status(200).json_body(json!({
            "name": "projects/test-project/releases/cloud.firestore",
            "rulesetName": "projects/test-project/rulesets/abc-123"
        }));
    });

    let report = rules.deploy_firestore_rules(&path).await.unwrap();

    update.assert();
    create_release.assert();
    assert_eq!(report.release, ReleaseMode::Created);
}

#[tokio::test]
async fn test_failed_ruleset_skips_release_and_keeps_body() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(&dir);

    let body = r#"{"error":{"code":400,"message":"Syntax error at line 3","status":"INVALID_ARGUMENT"}}"#;
    let create = server.mock(|when, then| {
        when.method(POST).path(format!("{}/rulesets", PROJECT));
        then.status(400)
            .header("content-type", "application/json")
            .body(body);
    });
    let release = server.mock(|when, then| {
        when.path_matches(".*/releases.*");
        then.status(200).json_body(json!({}));
    });

    let err = rules.deploy_firestore_rules(&path).await.err().unwrap();

    create.assert();
    release.assert_calls(0);
    match &err {
        RulesError::CreateRuleset { status, body: got } => {
            assert_eq!(*status, StatusCode::BAD_REQUEST);
            assert_eq!(got, body);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), format!("Error creating ruleset: {}", body));
}

#[tokio::test]
async fn test_both_release_attempts_failing_reports_second_body() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();
    let path = write_rules(&dir);

    mock_create_ruleset(&server);
    server.mock(|when, then| {
        when.method(PATCH)
            .path(format!("{}/releases/cloud.firestore", PROJECT));
        then.status(404).body("update failed");
    });
    server.mock(|when, then| {
        when.method(POST).path(format!("{}/releases", PROJECT));
        then.status(409).body("release already exists");
    });

    let err = rules.deploy_firestore_rules(&path).await.err().unwrap();
    match err {
        RulesError::Release {
            ruleset_name,
            status,
            body,
        } => {
            assert_eq!(ruleset_name, "projects/test-project/rulesets/abc-123");
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(body, "release already exists");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_missing_rules_file_makes_no_requests() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();

    let any = server.mock(|when, then| {
        when.path_matches(".*");
        then.status(200).json_body(json!({}));
    });

    let err = rules
        .deploy_firestore_rules(&dir.path().join("firestore.rules"))
        .await
        .err()
        .unwrap();

    any.assert_calls(0);
    assert!(matches!(err, RulesError::Io { .. }));
}

#[tokio::test]
async fn test_check_indexes_counts_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("firestore.indexes.json");
    std::fs::write(
        &path,
        json!({
            "indexes": [
                {
                    "collectionGroup": "posts",
                    "queryScope": "COLLECTION",
                    "fields": [
                        { "fieldPath": "authorId", "order": "ASCENDING" },
                        { "fieldPath": "createdAt", "order": "DESCENDING" }
                    ]
                }
            ],
            "fieldOverrides": []
        })
        .to_string(),
    )
    .unwrap();

    let report = check_indexes(&path).await.unwrap();
    assert_eq!(
        report,
        IndexesReport::Skipped {
            indexes: 1,
            field_overrides: 0
        }
    );
}

#[tokio::test]
async fn test_check_indexes_missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("firestore.indexes.json");

    let report = check_indexes(&path).await.unwrap();
    assert_eq!(report, IndexesReport::Missing(path));
}

#[test]
fn test_deploy_targets_default_to_rules() {
    assert_eq!(
        DeployTargets::from_flags(false, false),
        DeployTargets { rules: true, indexes: false }
    );
    assert_eq!(
        DeployTargets::from_flags(false, true),
        DeployTargets { rules: false, indexes: true }
    );
    assert_eq!(
        DeployTargets::from_flags(true, true),
        DeployTargets { rules: true, indexes: true }
    );
}

#[tokio::test]
async fn test_deploy_checks_indexes_after_rules_failure() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();
    write_rules(&dir);
    std::fs::write(
        dir.path().join("firestore.indexes.json"),
        json!({ "indexes": [], "fieldOverrides": [{ "collectionGroup": "posts" }] }).to_string(),
    )
    .unwrap();

    let body = r#"{"error":{"code":400,"message":"Syntax error","status":"INVALID_ARGUMENT"}}"#;
    let create = server.mock(|when, then| {
        when.method(POST).path(format!("{}/rulesets", PROJECT));
        then.status(400).body(body);
    });

    let outcome = rules
        .deploy(
            &ProjectPaths::new(dir.path()),
            DeployTargets::from_flags(true, true),
        )
        .await;

    create.assert();
    match outcome.rules {
        Some(Err(err)) => assert_eq!(err.to_string(), format!("Error creating ruleset: {}", body)),
        other => panic!("unexpected rules outcome: {other:?}"),
    }
    assert_eq!(
        outcome.indexes.unwrap().unwrap(),
        IndexesReport::Skipped {
            indexes: 0,
            field_overrides: 1
        }
    );
}

#[tokio::test]
async fn test_deploy_without_index_flag_skips_index_check() {
    let server = MockServer::start();
    let rules = rules_client(&server);
    let dir = tempfile::tempdir().unwrap();

    let outcome = rules
        .deploy(
            &ProjectPaths::new(dir.path()),
            DeployTargets::from_flags(false, false),
        )
        .await;

    assert!(matches!(outcome.rules, Some(Err(RulesError::Io { .. }))));
    assert!(outcome.indexes.is_none());
}
