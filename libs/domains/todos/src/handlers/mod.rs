mod direct;
mod grpc;

pub use grpc::TodoGrpcService;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{MethodRouter, delete, get, patch, post},
};
use axum_helpers::{JwtAuth, jwt_auth_middleware};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{ClearCompletedResponse, CreateTodo, ReplaceTodo, Todo, UpdateTodo};
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// OpenAPI documentation for the Todos API
#[derive(OpenApi)]
#[openapi(
    paths(
        direct::list_todos,
        direct::get_todo,
        direct::create_todo,
        direct::replace_todo,
        direct::update_todo,
        direct::delete_todo,
        direct::toggle_todo,
        direct::clear_completed,
    ),
    components(
        schemas(Todo, CreateTodo, ReplaceTodo, UpdateTodo, ClearCompletedResponse)
    ),
    tags(
        (name = "todos", description = "Todo list operations")
    )
)]
pub struct TodosApiDoc;

/// Todo routes. Reads are open; every mutation requires an access token.
pub fn router<R: TodoRepository + 'static>(service: TodoService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);
    let protected = |route: MethodRouter<Arc<TodoService<R>>>| {
        route.route_layer(from_fn_with_state(auth.clone(), jwt_auth_middleware))
    };

    Router::new()
        .route(
            "/todos/",
            get(direct::list_todos::<R>).merge(protected(post(direct::create_todo::<R>))),
        )
        .route(
            "/todos/clear_completed/",
            protected(delete(direct::clear_completed::<R>)),
        )
        .route(
            "/todos/{id}/",
            get(direct::get_todo::<R>).merge(protected(
                patch(direct::update_todo::<R>)
                    .put(direct::replace_todo::<R>)
                    .delete(direct::delete_todo::<R>),
            )),
        )
        .route(
            "/todos/{id}/toggle/",
            protected(patch(direct::toggle_todo::<R>)),
        )
        .with_state(shared_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTodoRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use axum_helpers::JwtConfig;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        token: String,
    }

    impl TestApp {
        fn new() -> Self {
            let config = JwtConfig::new("handler-test-secret-long-enough!!").unwrap();
            let auth = JwtAuth::new(&config);
            let token = auth.create_access_token("1", "admin").unwrap();
            let service = TodoService::new(InMemoryTodoRepository::new());
            Self {
                router: router(service, auth),
                token,
            }
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            body: Option<Value>,
            authorized: bool,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if authorized {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
            }
            let body = match body {
                Some(json) => {
                    request = request.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };

            let response = self
                .router
                .clone()
                .oneshot(request.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }

        async fn create(&self, body: Value) -> Value {
            let (status, todo) = self.send("POST", "/todos/", Some(body), true).await;
            assert_eq!(status, StatusCode::CREATED);
            todo
        }
    }

    #[tokio::test]
    async fn test_create_returns_201_with_defaults() {
        let app = TestApp::new();
        let todo = app.create(json!({ "title": "  Buy milk " })).await;

        assert_eq!(todo["title"], "Buy milk");
        assert_eq!(todo["priority"], 2);
        assert_eq!(todo["completed"], false);
        assert_eq!(todo["created_at"], todo["updated_at"]);
    }

    #[tokio::test]
    async fn test_mutations_require_token() {
        let app = TestApp::new();
        let (status, body) = app
            .send("POST", "/todos/", Some(json!({ "title": "t" })), false)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "UNAUTHORIZED");

        let (status, _) = app
            .send("DELETE", "/todos/clear_completed/", None, false)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, list) = app.send("GET", "/todos/", None, false).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_invalid_priority_is_field_error() {
        let app = TestApp::new();
        let (status, body) = app
            .send(
                "POST",
                "/todos/",
                Some(json!({ "title": "t", "priority": 4 })),
                true,
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["priority"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = TestApp::new();
        let request = Request::post("/todos/")
            .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\": "))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_and_non_numeric_ids_are_404() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/todos/99/", None, false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");

        let (status, _) = app.send("GET", "/todos/abc/", None, false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_and_rejects_unknown_params() {
        let app = TestApp::new();
        app.create(json!({ "title": "Buy milk", "priority": 1 }))
            .await;
        app.create(json!({ "title": "Walk dog", "completed": true }))
            .await;

        let (_, list) = app.send("GET", "/todos/?completed=TRUE", None, false).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["title"], "Walk dog");

        let (_, list) = app.send("GET", "/todos/?search=MILK", None, false).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, body) = app.send("GET", "/todos/?colour=red", None, false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_QUERY");

        let (status, _) = app.send("GET", "/todos/?ordering=title", None, false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_patch_toggle_delete_flow() {
        let app = TestApp::new();
        let todo = app.create(json!({ "title": "t" })).await;
        let uri = format!("/todos/{}/", todo["id"]);

        let (status, replaced) = app
            .send(
                "PUT",
                &uri,
                Some(json!({ "title": "new", "priority": 3, "completed": false })),
                true,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(replaced["priority"], 3);

        let (status, _) = app
            .send("PUT", &uri, Some(json!({ "title": "x" })), true)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, patched) = app
            .send("PATCH", &uri, Some(json!({ "title": "patched" })), true)
            .await;
        assert_eq!(patched["title"], "patched");
        assert_eq!(patched["priority"], 3);

        let toggle_uri = format!("/todos/{}/toggle/", todo["id"]);
        let (status, toggled) = app.send("PATCH", &toggle_uri, None, true).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["completed"], true);

        let (status, body) = app.send("DELETE", &uri, None, true).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.send("DELETE", &uri, None, true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.send("PATCH", &toggle_uri, None, true).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_update_fields_leave_todo_unchanged() {
        let app = TestApp::new();
        let todo = app
            .create(json!({ "title": "Keep me", "priority": 1 }))
            .await;
        let uri = format!("/todos/{}/", todo["id"]);

        let cases = [
            ("PATCH", json!({ "priority": 4 }), "priority"),
            ("PATCH", json!({ "priority": 0 }), "priority"),
            ("PATCH", json!({ "title": "  " }), "title"),
            ("PATCH", json!({ "title": "nul\0" }), "title"),
            (
                "PUT",
                json!({ "title": "new", "priority": 4, "completed": true }),
                "priority",
            ),
        ];
        for (method, body, field) in cases {
            let (status, error) = app.send(method, &uri, Some(body), true).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error["error"], "VALIDATION_ERROR");
            assert!(error["details"][field].is_array(), "{method} {field}");
        }

        let (status, current) = app.send("GET", &uri, None, false).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(current, todo);
    }

    #[tokio::test]
    async fn test_null_characters_are_client_errors() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/todos/", Some(json!({ "title": "milk\0" })), true)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"]["title"].is_array());

        let (status, body) = app.send("GET", "/todos/?search=%00", None, false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_QUERY");

        let (_, list) = app.send("GET", "/todos/", None, false).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_clear_completed_reports_count() {
        let app = TestApp::new();
        app.create(json!({ "title": "a", "completed": true })).await;
        app.create(json!({ "title": "b" })).await;

        let (status, body) = app
            .send("DELETE", "/todos/clear_completed/", None, true)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], 1);

        let (_, body) = app
            .send("DELETE", "/todos/clear_completed/", None, true)
            .await;
        assert_eq!(body["deletedCount"], 0);
    }

    #[test]
    fn test_openapi_lists_todo_paths() {
        let doc = TodosApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/todos/"));
        assert!(doc.paths.paths.contains_key("/todos/{id}/toggle/"));
        assert!(doc.paths.paths.contains_key("/todos/clear_completed/"));
    }
}
