use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use httpmock::MockServer;
use postdesk::{
    config::RemoteSettings,
    infra::{
        http::{HttpState, build_router, sessions::PageSession},
        remote::RemotePostsClient,
    },
};
use serde_json::json;
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;

fn app_for(server: &MockServer) -> (Router, HttpState) {
    let base = Url::parse(&server.base_url()).expect("mock server url");
    let client = RemotePostsClient::new(&RemoteSettings::new(base)).expect("client builds");
    let state = HttpState::new(Arc::new(client));
    (build_router(state.clone()), state)
}

async fn send(app: &Router, method: Method, uri: &str, form: Option<&str>) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_owned())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Loads the page and returns its html with the session it opened.
async fn open_page(app: &Router) -> (String, Uuid) {
    let (status, html) = send(app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);

    let marker = "data-session=\"";
    let start = html.find(marker).expect("page carries its session") + marker.len();
    let end = start + html[start..].find('"').expect("closing quote");
    let session = Uuid::parse_str(&html[start..end]).expect("session id");
    (html, session)
}

fn session(state: &HttpState, id: Uuid) -> Arc<PageSession> {
    state.sessions.get(&id).expect("session is live")
}

fn url(session: Uuid, action: &str) -> String {
    format!("/sessions/{session}/posts/{action}")
}

/// Splits an SSE body into its events.
fn events_of(body: &str) -> Vec<&str> {
    body.split("\n\n")
        .filter(|event| !event.trim().is_empty())
        .collect()
}

async fn seed(server: &MockServer, posts: serde_json::Value) {
    server
        .mock_async(move |when, then| {
            when.method("GET").path("/posts");
            then.status(200).json_body(posts.clone());
        })
        .await;
}

#[tokio::test]
async fn index_renders_fetched_posts_in_order() {
    let server = MockServer::start_async().await;
    seed(
        &server,
        json!([
            {"id": 1, "title": "First title", "body": "first body"},
            {"id": 2, "title": "Second title", "body": "second body"}
        ]),
    )
    .await;
    let (app, _) = app_for(&server);

    let (html, session) = open_page(&app).await;

    let first = html.find("First title").expect("first row");
    let second = html.find("Second title").expect("second row");
    assert!(first < second);
    assert!(html.contains("data-posts=\"modal\""));
    assert!(html.contains("Add New Post"));
    assert!(html.contains(&url(session, "new")));
}

#[tokio::test]
async fn index_survives_remote_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/posts");
            then.status(500);
        })
        .await;
    let (app, state) = app_for(&server);

    let (html, id) = open_page(&app).await;

    assert!(html.contains("No data"));
    let session = session(&state, id);
    assert!(session.manager.lock().await.state().posts.is_empty());
}

#[tokio::test]
async fn submit_in_create_mode_appends_and_notifies() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 1, "title": "A", "body": "B"}])).await;
    let create = server
        .mock_async(|when, then| {
            when.method("POST")
                .path("/posts")
                .json_body(json!({"title": "Fresh", "body": "Text"}));
            then.status(201)
                .json_body(json!({"id": 101, "title": "Fresh", "body": "Text"}));
        })
        .await;
    let (app, state) = app_for(&server);

    let (_, id) = open_page(&app).await;
    let (status, _) = send(&app, Method::POST, &url(id, "new"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, events) = send(
        &app,
        Method::POST,
        &url(id, "submit"),
        Some("title=Fresh&body=Text"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    create.assert_async().await;
    assert!(events.contains("Fresh"));
    assert!(events.contains("Post added successfully"));

    let session = session(&state, id);
    let manager = session.manager.lock().await;
    let ids: Vec<u64> = manager.state().posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![1, 101]);
    assert!(!manager.state().modal_open);
    assert!(!manager.state().busy);
}

#[tokio::test]
async fn submit_renders_busy_panel_before_the_result() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 1, "title": "A", "body": "B"}])).await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/posts");
            then.status(201)
                .json_body(json!({"id": 101, "title": "Fresh", "body": "Text"}));
        })
        .await;
    let (app, _) = app_for(&server);

    let (_, id) = open_page(&app).await;
    send(&app, Method::POST, &url(id, "new"), None).await;
    let (_, body) = send(
        &app,
        Method::POST,
        &url(id, "submit"),
        Some("title=Fresh&body=Text"),
    )
    .await;

    let events = events_of(&body);
    let first = events.first().expect("at least one event");
    assert!(first.contains("data-posts=\"panel\""));
    assert!(first.contains("posts__spinner"));
    assert!(first.contains("disabled"));
    assert!(!first.contains("Post added successfully"));

    let last_panel = events
        .iter()
        .rev()
        .find(|event| event.contains("data-posts=\"panel\""))
        .expect("final panel render");
    assert!(!last_panel.contains("posts__spinner"));
    assert!(last_panel.contains("Fresh"));
}

#[tokio::test]
async fn submit_with_blank_fields_sends_nothing() {
    let server = MockServer::start_async().await;
    seed(&server, json!([])).await;
    let (app, state) = app_for(&server);

    let (_, id) = open_page(&app).await;
    send(&app, Method::POST, &url(id, "new"), None).await;
    let (status, events) = send(
        &app,
        Method::POST,
        &url(id, "submit"),
        Some("title=+++&body=text"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(events.contains("Missing fields"));
    assert!(!events.contains("Error adding post"));
    assert!(!events.contains("posts__spinner"));

    let session = session(&state, id);
    let manager = session.manager.lock().await;
    assert!(manager.state().posts.is_empty());
    assert!(manager.state().modal_open);
}

#[tokio::test]
async fn edit_then_submit_replaces_the_entry() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 1, "title": "A", "body": "B"}])).await;
    let update = server
        .mock_async(|when, then| {
            when.method("PUT")
                .path("/posts/1")
                .json_body(json!({"title": "A2", "body": "B2", "id": 1}));
            then.status(200)
                .json_body(json!({"id": 1, "title": "A2", "body": "B2"}));
        })
        .await;
    let (app, state) = app_for(&server);

    let (_, id) = open_page(&app).await;
    let (_, modal) = send(&app, Method::POST, &url(id, "1/edit"), None).await;
    assert!(modal.contains("Edit Post"));
    assert!(modal.contains("Update Post"));

    let (_, events) = send(&app, Method::POST, &url(id, "submit"), Some("title=A2&body=B2")).await;

    update.assert_async().await;
    assert!(events.contains("Post updated successfully"));

    let session = session(&state, id);
    let manager = session.manager.lock().await;
    let posts = manager.state().posts.as_slice();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "A2");
    assert_eq!(posts[0].body, "B2");
    assert_eq!(manager.state().editing, None);
    assert!(!manager.state().modal_open);
}

#[tokio::test]
async fn reload_in_another_tab_keeps_an_open_edit() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 1, "title": "A", "body": "B"}])).await;
    let update = server
        .mock_async(|when, then| {
            when.method("PUT").path("/posts/1");
            then.status(200)
                .json_body(json!({"id": 1, "title": "A2", "body": "B2"}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method("POST").path("/posts");
            then.status(201)
                .json_body(json!({"id": 101, "title": "A2", "body": "B2"}));
        })
        .await;
    let (app, state) = app_for(&server);

    let (_, first_tab) = open_page(&app).await;
    send(&app, Method::POST, &url(first_tab, "1/edit"), None).await;

    let (_, second_tab) = open_page(&app).await;
    assert_ne!(first_tab, second_tab);

    let (status, events) = send(
        &app,
        Method::POST,
        &url(first_tab, "submit"),
        Some("title=A2&body=B2"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(events.contains("Post updated successfully"));
    update.assert_hits_async(1).await;
    create.assert_hits_async(0).await;

    let first = session(&state, first_tab);
    let manager = first.manager.lock().await;
    let posts = manager.state().posts.as_slice();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[0].title, "A2");

    let second = session(&state, second_tab);
    let untouched = second.manager.lock().await;
    assert_eq!(untouched.state().posts.as_slice()[0].title, "A");
    assert!(!untouched.state().modal_open);
}

#[tokio::test]
async fn page_loads_while_another_tab_waits_on_the_remote() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 1, "title": "A", "body": "B"}])).await;
    server
        .mock_async(|when, then| {
            when.method("POST").path("/posts");
            then.status(201)
                .delay(Duration::from_secs(3))
                .json_body(json!({"id": 101, "title": "Slow", "body": "Text"}));
        })
        .await;
    let (app, state) = app_for(&server);

    let (_, slow_tab) = open_page(&app).await;
    send(&app, Method::POST, &url(slow_tab, "new"), None).await;

    let pending = {
        let app = app.clone();
        let uri = url(slow_tab, "submit");
        tokio::spawn(async move {
            send(&app, Method::POST, &uri, Some("title=Slow&body=Text")).await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(session(&state, slow_tab).manager.try_lock().is_err());

    let loaded = tokio::time::timeout(Duration::from_secs(1), open_page(&app)).await;
    let (html, fresh_tab) = loaded.expect("page load is not blocked by another tab");
    assert_ne!(fresh_tab, slow_tab);
    assert!(!html.contains("posts__spinner"));

    let opened = tokio::time::timeout(
        Duration::from_secs(1),
        send(&app, Method::POST, &url(fresh_tab, "new"), None),
    )
    .await
    .expect("other tab stays responsive");
    assert_eq!(opened.0, StatusCode::OK);

    pending.abort();
}

#[tokio::test]
async fn editing_an_unknown_post_reports_not_found() {
    let server = MockServer::start_async().await;
    seed(&server, json!([])).await;
    let (app, _) = app_for(&server);

    let (_, id) = open_page(&app).await;
    let (status, events) = send(&app, Method::POST, &url(id, "42/edit"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(events.contains("Post not found"));
}

#[tokio::test]
async fn delete_removes_the_row() {
    let server = MockServer::start_async().await;
    seed(
        &server,
        json!([
            {"id": 1, "title": "Keep me", "body": "x"},
            {"id": 2, "title": "Drop me", "body": "y"}
        ]),
    )
    .await;
    let delete = server
        .mock_async(|when, then| {
            when.method("DELETE").path("/posts/2");
            then.status(200).body("{}");
        })
        .await;
    let (app, _) = app_for(&server);

    let (_, id) = open_page(&app).await;
    let (status, body) = send(&app, Method::POST, &url(id, "2/delete"), None).await;

    assert_eq!(status, StatusCode::OK);
    delete.assert_async().await;
    assert!(body.contains("Post deleted successfully"));

    let events = events_of(&body);
    let first = events.first().expect("busy render");
    assert!(first.contains("posts__spinner"));
    assert!(first.contains("Drop me"));

    let last_panel = events
        .iter()
        .rev()
        .find(|event| event.contains("data-posts=\"panel\""))
        .expect("final panel render");
    assert!(last_panel.contains("Keep me"));
    assert!(!last_panel.contains("Drop me"));
    assert!(!last_panel.contains("posts__spinner"));
}

#[tokio::test]
async fn failed_delete_keeps_the_row() {
    let server = MockServer::start_async().await;
    seed(&server, json!([{"id": 5, "title": "Sticky", "body": "z"}])).await;
    server
        .mock_async(|when, then| {
            when.method("DELETE").path("/posts/5");
            then.status(500);
        })
        .await;
    let (app, state) = app_for(&server);

    let (_, id) = open_page(&app).await;
    let (_, events) = send(&app, Method::POST, &url(id, "5/delete"), None).await;

    assert!(events.contains("Sticky"));
    assert!(events.contains("Error deleting post"));
    let session = session(&state, id);
    let manager = session.manager.lock().await;
    assert_eq!(manager.state().posts.len(), 1);
    assert!(!manager.state().busy);
}

#[tokio::test]
async fn unknown_session_is_gone() {
    let server = MockServer::start_async().await;
    let (app, _) = app_for(&server);

    let (status, body) = send(&app, Method::POST, &url(Uuid::new_v4(), "new"), None).await;

    assert_eq!(status, StatusCode::GONE);
    assert!(body.contains("reload"));
}

#[tokio::test]
async fn health_reports_no_content() {
    let server = MockServer::start_async().await;
    let (app, _) = app_for(&server);

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}
