//! Behavioural properties of a full invocation, driven through the public
//! API with a scripted backend

use cj_run::backend::scripted::ScriptedTransport;
use cj_run::backend::Reply;
use cj_run::common::config::Config;
use cj_run::{ActionInputs, Orchestrator, Outcome};

const LOGIN: &str = "/auth/login_service_account";
const RUN_ALL: &str = "/test-suites/collection/collection-id/run-all";
const COLLECTION: &str = "/test-suites/collection/collection-id";

fn inputs() -> ActionInputs {
    ActionInputs {
        service_account_key: Some("test_key".to_string()),
        wait_timeout_seconds: 300,
        ..Default::default()
    }
}

async fn run(transport: &ScriptedTransport, inputs: &ActionInputs) -> Outcome {
    let config = Config::default();
    Orchestrator::new(&config, transport).run(inputs).await
}

#[tokio::test]
async fn login_rejections_all_fail_the_run() {
    for status in [400, 401, 403, 404, 500, 503] {
        let transport = ScriptedTransport::new().on_post(LOGIN, Reply::new(status, r#""jwt""#));
        let outcome = run(&transport, &ActionInputs { test_id: Some("case".into()), ..inputs() }).await;

        assert!(!outcome.success, "status {status} should fail");
        assert_eq!(outcome.message, "Failed to login service account.");
        assert_eq!(transport.requests().len(), 1);
    }
}

#[tokio::test]
async fn malformed_overrides_never_reach_the_backend() {
    for raw in [r#""foo": "bar""#, "{", "{'a': 1}", "not json", "{\"a\": }"] {
        let transport = ScriptedTransport::new();
        let outcome = run(
            &transport,
            &ActionInputs {
                test_id: Some("case".into()),
                params_override: Some(raw.to_string()),
                ..inputs()
            },
        )
        .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("Invalid JSON"), "{raw}: {}", outcome.message);
        assert!(transport.requests().is_empty());
    }
}

#[tokio::test]
async fn wait_timeout_boundaries() {
    for (secs, valid) in [(29, false), (30, true), (900, true), (901, false), (1000, false)] {
        let transport = ScriptedTransport::new().on_post(LOGIN, Reply::new(401, ""));
        let outcome = run(
            &transport,
            &ActionInputs { test_id: Some("case".into()), wait_timeout_seconds: secs, ..inputs() },
        )
        .await;

        if valid {
            assert_eq!(outcome.message, "Failed to login service account.");
            assert_eq!(transport.requests().len(), 1);
        } else {
            assert!(outcome.message.contains("WAIT_TIMEOUT_SECONDS"));
            assert!(transport.requests().is_empty());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn single_run_with_settings() {
    let transport = ScriptedTransport::new()
        .on_post(LOGIN, Reply::new(200, r#""jwt""#))
        .on_post("/test-run/test-case-id", Reply::new(201, r#""test-run-id""#))
        .on_get("/test-run/test-run-id", Reply::new(200, r#"{"status": "passed"}"#));

    let outcome = run(
        &transport,
        &ActionInputs {
            test_id: Some("test-case-id".into()),
            website_url_override: Some("https://example.com".into()),
            params_override: Some(r#"{"foo": "bar"}"#.into()),
            ..inputs()
        },
    )
    .await;

    assert_eq!(outcome, Outcome::passed("Test passed!"));
    let trigger = &transport.requests()[1];
    assert_eq!(trigger.bearer, "jwt");
    assert_eq!(
        trigger.body,
        Some(serde_json::json!({
            "settings": {
                "website_url_override": "https://example.com",
                "parameter_overrides": {"foo": "bar"}
            }
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn collection_run_ignores_previous_batches() {
    let transport = ScriptedTransport::new()
        .on_post(LOGIN, Reply::new(200, r#""jwt""#))
        .on_post(RUN_ALL, Reply::new(200, r#""2025-01-01T00:00:00Z""#))
        .on_get(
            COLLECTION,
            Reply::new(
                200,
                r#"{"test_suite_id": "project-id", "linked_runs": [
                    {"id": "old-1", "status": "failed", "created_at": "2024-12-30T10:00:00Z"},
                    {"id": "new-1", "status": "pending", "created_at": "2025-01-01T00:00:00Z"}
                ]}"#,
            ),
        )
        .on_get(
            COLLECTION,
            Reply::new(
                200,
                r#"{"test_suite_id": "project-id", "linked_runs": [
                    {"id": "old-1", "status": "failed", "created_at": "2024-12-30T10:00:00Z"},
                    {"id": "new-1", "status": "passed", "created_at": "2025-01-01T00:00:00Z"}
                ]}"#,
            ),
        );

    let outcome = run(&transport, &ActionInputs { test_suite_id: Some("collection-id".into()), ..inputs() }).await;

    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(
        outcome.message,
        "1 passed, 0 failed. See status here: \
         https://cj.foreai.co/collections/project-id/collection-id?created_at=2025-01-01T00:00:00.000000Z"
    );
    assert_eq!(transport.count("GET", COLLECTION), 2);
    assert_eq!(transport.requests()[1].body, Some(serde_json::json!({})));
}

#[tokio::test(start_paused = true)]
async fn collection_timeout_is_bounded_by_wait_budget() {
    let transport = ScriptedTransport::new()
        .on_post(LOGIN, Reply::new(200, r#""jwt""#))
        .on_post(RUN_ALL, Reply::new(200, r#""2025-01-01T00:00:00Z""#))
        .on_get(
            COLLECTION,
            Reply::new(
                200,
                r#"{"test_suite_id": "p", "linked_runs": [
                    {"id": "a", "status": "pending", "created_at": "2025-01-01T00:00:00Z"}
                ]}"#,
            ),
        );

    let start = tokio::time::Instant::now();
    let outcome = run(
        &transport,
        &ActionInputs {
            test_suite_id: Some("collection-id".into()),
            wait_timeout_seconds: 60,
            ..inputs()
        },
    )
    .await;

    assert_eq!(outcome, Outcome::failed("Timed out waiting for test suite result."));
    assert_eq!(transport.count("GET", COLLECTION), 6);
    assert!(start.elapsed() <= std::time::Duration::from_secs(60));
}
