use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use launchpad_core::deploy::DeployStep;
use launchpad_core::fake::{Call, CallLog, FakeDeployment, FakeStore};
use launchpad_core::identity::sign_token_for;
use launchpad_core::types::{NewProject, Project};
use launchpad_core::{Orchestrator, SessionIdentity, TokenIdentity};
use launchpad_server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ACTIONS: [&str; 4] = [
    "/create_project",
    "/start_project",
    "/stop_project",
    "/delete_project",
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(deploy: FakeDeployment, store: FakeStore) -> Router {
    let orchestrator = Orchestrator::new(Arc::new(deploy), Arc::new(store), "org-1");
    build_router(AppState::new(orchestrator, Arc::new(SessionIdentity)))
}

fn fakes() -> (CallLog, FakeDeployment, FakeStore) {
    let log = CallLog::default();
    let deploy = FakeDeployment::new(log.clone());
    let store = FakeStore::new(log.clone());
    (log, deploy, store)
}

fn stored(id: i32) -> Project {
    Project {
        id,
        name: "demo".into(),
        url: "https://demo.example".into(),
        qovery_project_id: "qp-9".into(),
        qovery_environment_id: "qe-9".into(),
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

fn action(user_id: &str, input: Value) -> Value {
    json!({
        "action": {"name": "ignored"},
        "session_variables": {"x-hasura-role": "user", "x-hasura-user-id": user_id},
        "input": {"input": input},
    })
}

// ---------------------------------------------------------------------------
// Payload and identity checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_payload_is_rejected_on_every_action() {
    for uri in ACTIONS {
        let (log, deploy, store) = fakes();
        let (status, body) = post_raw(app(deploy, store), uri, "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "invalid payload", "{uri}");
        assert!(log.calls().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn missing_user_id_is_rejected_on_every_action() {
    let inputs = [
        json!({"name": "demo"}),
        json!({"id": 1}),
        json!({"id": 1}),
        json!({"id": 1}),
    ];
    for (uri, input) in ACTIONS.into_iter().zip(inputs) {
        let (log, deploy, store) = fakes();
        let body = json!({"session_variables": {"x-hasura-role": "user"}, "input": {"input": input}});
        let (status, body) = post_json(app(deploy, store), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "user not authenticated", "{uri}");
        assert!(log.calls().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
    let (log, deploy, store) = fakes();
    let (status, body) = post_json(
        app(deploy, store),
        "/create_project",
        action("", json!({"name": "demo"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user not authenticated");
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn missing_user_id_wins_over_unusable_input() {
    let cases = [
        ("/create_project", json!({"session_variables": {}, "input": {}})),
        (
            "/create_project",
            json!({"session_variables": {"x-hasura-user-id": ""}, "input": {"input": {}}}),
        ),
        ("/start_project", json!({"session_variables": {}})),
        (
            "/delete_project",
            json!({"session_variables": {"x-hasura-role": "user"}, "input": {"input": {"id": null}}}),
        ),
    ];
    for (uri, body) in cases {
        let (log, deploy, store) = fakes();
        let (status, resp) = post_json(app(deploy, store), uri, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
        assert_eq!(resp["message"], "user not authenticated", "{uri} {body}");
        assert!(log.calls().is_empty(), "{uri} {body}");
    }
}

#[tokio::test]
async fn authenticated_caller_without_input_is_malformed() {
    for uri in ACTIONS {
        let (log, deploy, store) = fakes();
        let body = json!({"session_variables": {"x-hasura-user-id": "7"}});
        let (status, resp) = post_json(app(deploy, store), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(resp["message"], "invalid payload", "{uri}");
        assert!(log.calls().is_empty(), "{uri}");
    }
}

#[tokio::test]
async fn wrong_input_shape_is_malformed() {
    let (log, deploy, store) = fakes();
    let (status, body) = post_json(
        app(deploy, store),
        "/start_project",
        action("7", json!({"id": "seven"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid payload");
    assert!(log.calls().is_empty());
}

// ---------------------------------------------------------------------------
// create_project
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_project_provisions_and_records() {
    let (log, deploy, store) = fakes();
    let deploy = deploy.with_links(&["https://demo.example"]);
    let store = store.with_next_id(5);

    let (status, body) = post_json(
        app(deploy, store),
        "/create_project",
        action("7", json!({"name": "demo"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 5, "name": "demo", "url": "https://demo.example"})
    );
    assert_eq!(
        log.calls().last(),
        Some(&Call::InsertProject(NewProject {
            owner_id: 7,
            name: "demo".into(),
            url: "https://demo.example".into(),
            qovery_project_id: "qp-1".into(),
            qovery_environment_id: "qe-1".into(),
        }))
    );
}

#[tokio::test]
async fn create_project_accepts_flat_input() {
    let (_log, deploy, store) = fakes();
    let body = json!({
        "session_variables": {"x-hasura-user-id": "7"},
        "input": {"name": "flat"},
    });
    let (status, body) = post_json(app(deploy, store), "/create_project", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "flat");
}

#[tokio::test]
async fn create_project_stops_at_first_remote_failure() {
    let (log, deploy, store) = fakes();
    let deploy = deploy.failing(
        DeployStep::CreateEnvironment,
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    let (status, body) = post_json(
        app(deploy, store),
        "/create_project",
        action("7", json!({"name": "demo"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "received 500 Internal Server Error creating a new environment from Qovery API"
    );
    assert_eq!(
        log.count(|c| matches!(c, Call::CreateApplication { .. } | Call::InsertProject(_))),
        0
    );
}

#[tokio::test]
async fn create_project_rejects_non_numeric_user_before_provisioning() {
    let (log, deploy, store) = fakes();
    let (status, body) = post_json(
        app(deploy, store),
        "/create_project",
        action("alice", json!({"name": "demo"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("alice"));
    assert!(log.calls().is_empty());
}

// ---------------------------------------------------------------------------
// start / stop / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_project_deploys_stored_environment() {
    let (log, deploy, store) = fakes();
    let store = store.with_project(stored(3));

    let (status, body) = post_json(
        app(deploy, store),
        "/start_project",
        action("7", json!({"id": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(
        log.calls(),
        vec![
            Call::ProjectsById(3),
            Call::DeployEnvironment {
                environment_id: "qe-9".into()
            },
        ]
    );
}

#[tokio::test]
async fn stop_project_stops_stored_environment() {
    let (log, deploy, store) = fakes();
    let store = store.with_project(stored(3));

    let (status, body) = post_json(
        app(deploy, store),
        "/stop_project",
        action("7", json!({"id": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(
        log.count(|c| matches!(c, Call::StopEnvironment { environment_id } if environment_id == "qe-9")),
        1
    );
}

#[tokio::test]
async fn unknown_project_is_not_found() {
    for uri in ["/start_project", "/stop_project", "/delete_project"] {
        let (log, deploy, store) = fakes();
        let (status, body) =
            post_json(app(deploy, store), uri, action("7", json!({"id": 404}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "project not found", "{uri}");
        assert_eq!(log.calls(), vec![Call::ProjectsById(404)], "{uri}");
    }
}

#[tokio::test]
async fn delete_project_removes_remote_then_record() {
    let (log, deploy, store) = fakes();
    let store = store.with_project(stored(3));

    let (status, body) = post_json(
        app(deploy, store),
        "/delete_project",
        action("7", json!({"id": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(
        log.calls(),
        vec![
            Call::ProjectsById(3),
            Call::DeleteProject {
                project_id: "qp-9".into()
            },
            Call::DeleteProjectRecord(3),
        ]
    );
}

#[tokio::test]
async fn failed_remote_delete_keeps_record() {
    let (log, deploy, store) = fakes();
    let deploy = deploy.failing(DeployStep::DeleteProject, StatusCode::BAD_GATEWAY);
    let store = store.with_project(stored(3));

    let (status, body) = post_json(
        app(deploy, store),
        "/delete_project",
        action("7", json!({"id": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "received 502 Bad Gateway deleting a project from Qovery API"
    );
    assert_eq!(log.count(|c| matches!(c, Call::DeleteProjectRecord(_))), 0);
}

// ---------------------------------------------------------------------------
// Token identity
// ---------------------------------------------------------------------------

fn token_app(deploy: FakeDeployment, store: FakeStore) -> Router {
    let orchestrator = Orchestrator::new(Arc::new(deploy), Arc::new(store), "org-1");
    build_router(AppState::new(
        orchestrator,
        Arc::new(TokenIdentity::new("s3cret")),
    ))
}

#[tokio::test]
async fn token_mode_reads_user_from_bearer_token() {
    let (log, deploy, store) = fakes();
    let token = sign_token_for("11", "s3cret").unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/create_project")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({"input": {"input": {"name": "demo"}}}).to_string(),
        ))
        .unwrap();

    let (status, _) = send(token_app(deploy, store), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        log.count(|c| matches!(c, Call::InsertProject(p) if p.owner_id == 11)),
        1
    );
}

#[tokio::test]
async fn token_mode_ignores_session_variables() {
    let (log, deploy, store) = fakes();
    let (status, body) = post_json(
        token_app(deploy, store),
        "/create_project",
        action("7", json!({"name": "demo"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user not authenticated");
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn token_mode_rejects_foreign_signature() {
    let (log, deploy, store) = fakes();
    let token = sign_token_for("11", "other").unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/start_project")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(json!({"input": {"id": 1}}).to_string()))
        .unwrap();

    let (status, body) = send(token_app(deploy, store), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user not authenticated");
    assert!(log.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthz_reports_ok() {
    let (_log, deploy, store) = fakes();
    let req = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(deploy, store), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
