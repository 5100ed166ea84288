//! End-to-end flows through the assembled router, backed by in-memory stores.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use axum_helpers::{JwtAuth, JwtConfig, create_router};
use chrono::{DateTime, Utc};
use core_config::Environment;
use domain_todos::{InMemoryTodoRepository, TodoGrpcService, TodoService};
use domain_users::{InMemoryUserRepository, UserService};
use http_body_util::BodyExt;
use rpc::todos::v1::ListTodosRequest;
use rpc::todos::v1::todo_service_server::TodoService as _;
use serde_json::{Value, json};
use todos_server::{api, openapi::ApiDoc};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-with-plenty-of-chars";

struct TestApp {
    router: Router,
    todos: TodoService<InMemoryTodoRepository>,
}

impl TestApp {
    async fn new() -> Self {
        let todos = TodoService::new(InMemoryTodoRepository::new());
        let users = UserService::new(InMemoryUserRepository::new());
        users.ensure_user("admin", "admin-password").await.unwrap();

        let jwt = JwtAuth::new(&JwtConfig::new(SECRET).unwrap());
        let routes = api::routes(todos.clone(), users, jwt, Environment::Development);
        let router = temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<ApiDoc>(routes).unwrap()
        });

        Self { router, todos }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login/",
                None,
                Some(json!({ "username": "admin", "password": "admin-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn create(&self, token: &str, body: Value) -> Value {
        let (status, created) = self
            .send("POST", "/api/todos/", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        created
    }

    async fn list(&self, uri: &str) -> Vec<Value> {
        let (status, body) = self.send("GET", uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }
}

fn titles(todos: &[Value]) -> Vec<&str> {
    todos.iter().map(|t| t["title"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn create_then_retrieve_with_defaults() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let created = app
        .create(&token, json!({ "title": "Buy milk", "priority": 1 }))
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, todo) = app
        .send("GET", &format!("/api/todos/{}/", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["priority"], 1);
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["created_at"], todo["updated_at"]);
}

#[tokio::test]
async fn reads_are_open_and_mutations_need_a_token() {
    let app = TestApp::new().await;

    assert!(app.list("/api/todos/").await.is_empty());

    let (status, body) = app
        .send("POST", "/api/todos/", None, Some(json!({ "title": "Sneaky" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = app
        .send(
            "DELETE",
            "/api/todos/clear_completed/",
            Some("not-a-jwt"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_priority_persists_nothing() {
    let app = TestApp::new().await;
    let token = app.login().await;

    for priority in [0, 4] {
        let (status, body) = app
            .send(
                "POST",
                "/api/todos/",
                Some(&token),
                Some(json!({ "title": "Bad", "priority": priority })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    assert!(app.list("/api/todos/").await.is_empty());
}

#[tokio::test]
async fn default_order_is_priority_then_newest() {
    let app = TestApp::new().await;
    let token = app.login().await;

    for (title, priority) in [("a", 2), ("b", 1), ("c", 3), ("d", 1)] {
        app.create(&token, json!({ "title": title, "priority": priority }))
            .await;
    }

    let todos = app.list("/api/todos/").await;
    assert_eq!(titles(&todos), vec!["d", "b", "a", "c"]);

    let todos = app.list("/api/todos/?ordering=-priority").await;
    assert_eq!(titles(&todos), vec!["c", "a", "b", "d"]);
}

#[tokio::test]
async fn filters_and_search() {
    let app = TestApp::new().await;
    let token = app.login().await;

    app.create(&token, json!({ "title": "Buy milk", "completed": true }))
        .await;
    app.create(&token, json!({ "title": "Buy bread", "priority": 1 }))
        .await;
    app.create(&token, json!({ "title": "Walk dog" })).await;

    let todos = app.list("/api/todos/?search=BUY").await;
    assert_eq!(todos.len(), 2);

    let todos = app.list("/api/todos/?completed=false&search=buy").await;
    assert_eq!(titles(&todos), vec!["Buy bread"]);

    let todos = app.list("/api/todos/?priority=1").await;
    assert_eq!(titles(&todos), vec!["Buy bread"]);

    let (status, body) = app
        .send("GET", "/api/todos/?ordering=title", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn toggle_twice_restores_completed() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let created = app.create(&token, json!({ "title": "Flip me" })).await;
    let uri = format!("/api/todos/{}/toggle/", created["id"]);

    let (status, first) = app.send("PATCH", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["completed"], true);

    let (_, second) = app.send("PATCH", &uri, Some(&token), None).await;
    assert_eq!(second["completed"], false);

    let stamps: Vec<DateTime<Utc>> = [&created, &first, &second]
        .iter()
        .map(|t| t["updated_at"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps[0] < stamps[1] && stamps[1] < stamps[2]);
}

#[tokio::test]
async fn delete_then_missing() {
    let app = TestApp::new().await;
    let token = app.login().await;
    let created = app.create(&token, json!({ "title": "Gone soon" })).await;
    let uri = format!("/api/todos/{}/", created["id"]);

    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = app.send("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_completed_reports_count() {
    let app = TestApp::new().await;
    let token = app.login().await;

    let (status, body) = app
        .send("DELETE", "/api/todos/clear_completed/", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 0);

    for (i, completed) in [true, false, true, false, true].into_iter().enumerate() {
        app.create(
            &token,
            json!({ "title": format!("todo {}", i), "completed": completed }),
        )
        .await;
    }

    let (_, body) = app
        .send("DELETE", "/api/todos/clear_completed/", Some(&token), None)
        .await;
    assert_eq!(body["deletedCount"], 3);

    let remaining = app.list("/api/todos/").await;
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|t| t["completed"] == false));
}

#[tokio::test]
async fn login_failures_are_uniform() {
    let app = TestApp::new().await;

    let wrong = app
        .send(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({ "username": "admin", "password": "guess" })),
        )
        .await;
    let unknown = app
        .send(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({ "username": "nobody", "password": "guess" })),
        )
        .await;

    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
}

#[tokio::test]
async fn renewal_token_yields_working_access_token() {
    let app = TestApp::new().await;
    let (_, login) = app
        .send(
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({ "username": "admin", "password": "admin-password" })),
        )
        .await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auth/refresh/",
            None,
            Some(json!({ "renewal_token": login["renewal_token"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["access_token"].as_str().unwrap();
    app.create(token, json!({ "title": "With renewed token" }))
        .await;
}

#[tokio::test]
async fn grpc_projection_matches_rest_list() {
    let app = TestApp::new().await;
    let token = app.login().await;
    for title in ["one", "two", "three"] {
        app.create(&token, json!({ "title": title })).await;
    }

    let grpc = TodoGrpcService::new(app.todos.clone());
    let list = grpc
        .list_todos(tonic::Request::new(ListTodosRequest {}))
        .await
        .unwrap()
        .into_inner();

    let rest = app.list("/api/todos/").await;
    assert_eq!(list.count as usize, rest.len());
    assert_eq!(list.todos.len(), rest.len());
    for (item, todo) in list.todos.iter().zip(&rest) {
        assert_eq!(item.id, todo["id"].as_i64().unwrap());
        assert_eq!(item.title, todo["title"].as_str().unwrap());
    }
}

#[tokio::test]
async fn openapi_and_unknown_routes() {
    let app = TestApp::new().await;

    let (status, doc) = app.send("GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/todos/"].is_object());

    let (status, body) = app.send("GET", "/api/nothing-here/", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}
