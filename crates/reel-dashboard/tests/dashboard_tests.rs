//! Dashboard session tests against a mocked Firestore REST API.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_dashboard::{
    load_catalog, ActiveJobsBadge, DashboardSession, DashboardState, DeleteOutcome,
    DELETE_FAILED, LOAD_FAILED, PUBLISH_FAILED,
};
use reel_firestore::{FirestoreClient, FirestoreConfig, MovieRepository, TokenSource};
use reel_models::{CoarseStatus, JobId, Stage};

const RUN_QUERY: &str = "/v1/projects/test-project/databases/(default)/documents:runQuery";
const POLL: Duration = Duration::from_millis(20);

fn name(id: &str) -> String {
    format!("projects/test-project/databases/(default)/documents/movies/{}", id)
}

fn repo(server: &MockServer) -> MovieRepository {
    let config = FirestoreConfig {
        endpoint: format!("{}/v1", server.uri()),
        ..FirestoreConfig::new("test-project")
    };
    MovieRepository::new(FirestoreClient::new(config, TokenSource::Static("t".into())).unwrap())
}

fn owner_snapshot() -> serde_json::Value {
    json!([
        {"document": {"name": name("running"), "fields": {
            "userId": {"stringValue": "u1"},
            "status": {"stringValue": "processing"},
            "progress": {"mapValue": {"fields": {
                "story": {"stringValue": "completed"},
                "images": {"stringValue": "processing"},
                "video": {"stringValue": "pending"}
            }}}
        }}},
        {"document": {"name": name("done"), "fields": {
            "userId": {"stringValue": "u1"},
            "status": {"stringValue": "completed"},
            "isPublished": {"booleanValue": false},
            "story": {"mapValue": {"fields": {"movie_info": {"mapValue": {"fields": {
                "title": {"stringValue": "Neon Rain"}
            }}}}}}
        }}}
    ])
}

async fn mount_snapshot(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(RUN_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(owner_snapshot()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_session_projects_first_snapshot() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    assert_eq!(session.state(), DashboardState::Loading);

    let DashboardState::Ready(cards) = session.next().await.unwrap() else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 2);

    let running = &cards[0];
    assert_eq!(running.view.active_stage, Some(Stage::Images));
    assert_eq!(running.view.status, CoarseStatus::Processing);
    assert_eq!(running.view.progress_percent, 50);
    assert!(running.hype_message.is_some());
    assert!(!running.show_actions);

    let done = &cards[1];
    assert_eq!(done.title, "Neon Rain");
    assert_eq!(done.view.progress_percent, 100);
    assert!(done.show_actions);
    assert!(!done.show_stage_bar);
    assert_eq!(done.publish_label, "Publish");
    assert_eq!(done.published_label, "Unpublished");

    session.close().await;
}

#[tokio::test]
async fn test_toggle_publish_updates_local_snapshot() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"/documents/movies/done$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": name("done")})))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    session.next().await.unwrap();

    session
        .toggle_publish(&JobId::from("done"), false)
        .await
        .unwrap();

    let published = session
        .jobs()
        .unwrap()
        .iter()
        .find(|j| j.id.as_str() == "done")
        .map(|j| j.is_published);
    assert_eq!(published, Some(true));

    session.close().await;
}

#[tokio::test]
async fn test_toggle_publish_failure_is_reported() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    session.next().await.unwrap();

    let err = session
        .toggle_publish(&JobId::from("done"), false)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), PUBLISH_FAILED);

    let unchanged = session
        .jobs()
        .unwrap()
        .iter()
        .find(|j| j.id.as_str() == "done")
        .map(|j| j.is_published);
    assert_eq!(unchanged, Some(false));
    session.close().await;
}

fn owner_filter(user_id: &str) -> serde_json::Value {
    json!({"structuredQuery": {"where": {"fieldFilter": {
        "field": {"fieldPath": "userId"},
        "op": "EQUAL",
        "value": {"stringValue": user_id}
    }}}})
}

#[tokio::test]
async fn test_switch_user_resubscribes_for_new_owner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY))
        .and(body_partial_json(owner_filter("u1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(owner_snapshot()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY))
        .and(body_partial_json(owner_filter("u2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": {"name": name("other"), "fields": {
                "userId": {"stringValue": "u2"},
                "status": {"stringValue": "queued"}
            }}}
        ])))
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    let DashboardState::Ready(first) = session.next().await.unwrap() else {
        panic!("expected cards");
    };
    assert_eq!(first.len(), 2);

    session.switch_user("u2").await;
    assert_eq!(session.user_id(), "u2");
    assert_eq!(session.state(), DashboardState::Loading);

    let DashboardState::Ready(cards) = session.next().await.unwrap() else {
        panic!("expected cards");
    };
    let ids: Vec<_> = cards.iter().map(|c| c.job_id.as_str()).collect();
    assert_eq!(ids, vec!["other"]);
    assert!(session.jobs().unwrap().iter().all(|j| j.owner == "u2"));

    session.close().await;
}

#[tokio::test]
async fn test_delete_declined_sends_nothing() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    let decline = |_: &str| false;

    let outcome = session.delete(&JobId::from("done"), &decline).await;
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    session.close().await;
}

#[tokio::test]
async fn test_delete_confirmed_and_failed() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"/documents/movies/done$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"/documents/movies/locked$"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    session.next().await.unwrap();
    let accept = |_: &str| true;

    assert_eq!(
        session.delete(&JobId::from("done"), &accept).await,
        DeleteOutcome::Deleted
    );
    assert_eq!(session.jobs().unwrap().len(), 1);

    assert_eq!(
        session.delete(&JobId::from("locked"), &accept).await,
        DeleteOutcome::Failed(DELETE_FAILED.to_string())
    );
    session.close().await;
}

#[tokio::test]
async fn test_read_failure_keeps_loading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut session = DashboardSession::open(repo(&server), "u1", POLL);
    let waited = tokio::time::timeout(Duration::from_millis(100), session.next()).await;
    assert!(waited.is_err());
    assert_eq!(session.state(), DashboardState::Loading);
    session.close().await;
}

#[tokio::test]
async fn test_badge_counts_active_jobs() {
    let server = MockServer::start().await;
    mount_snapshot(&server).await;

    let mut badge = ActiveJobsBadge::open(&repo(&server), "u1", POLL);
    assert_eq!(badge.label(), None);
    assert_eq!(badge.next().await, Some(1));
    assert_eq!(badge.label().as_deref(), Some("1"));
    badge.close().await;
}

#[tokio::test]
async fn test_catalog_groups_published_movies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RUN_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"document": {"name": name("a"), "fields": {
                "genre": {"stringValue": "noir"},
                "featured": {"booleanValue": true}
            }}},
            {"document": {"name": name("b"), "fields": {}}}
        ])))
        .mount(&server)
        .await;

    let catalog = load_catalog(&repo(&server)).await.unwrap();
    let ids: Vec<_> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["noir", "other"]);
    assert_eq!(
        catalog.featured.map(|j| j.id.as_str().to_string()).as_deref(),
        Some("a")
    );
}

#[tokio::test]
async fn test_catalog_read_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = load_catalog(&repo(&server)).await.unwrap_err();
    assert_eq!(err.user_message(), LOAD_FAILED);
}
