use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use nextblog::{AppState, config::AppConfig, routes::create_router};
use serde_json::{Value, json};
use std::collections::HashSet;
use tower::ServiceExt;

fn app() -> Router {
    create_router(AppState::new(AppConfig::default()))
}

fn empty_app() -> Router {
    create_router(AppState::new(AppConfig {
        seed_data: false,
        ..AppConfig::default()
    }))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn long_content() -> String {
    "This post body is comfortably longer than the fifty character minimum.".to_string()
}

#[tokio::test]
async fn fresh_start_lists_seed_data() {
    let app = app();

    let (status, categories) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories = categories.as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!((&categories[0]["id"], &categories[0]["name"]), (&json!("1"), &json!("General")));
    assert_eq!((&categories[1]["id"], &categories[1]["name"]), (&json!("2"), &json!("Tech")));

    let (status, users) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = users.as_array().unwrap().iter().map(|u| u["username"].clone()).collect();
    assert_eq!(names, vec![json!("johndoe"), json!("janedoe")]);

    let (status, posts) = get(&app, "/api/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(posts.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unseeded_store_starts_empty() {
    let app = empty_app();
    for uri in ["/api/users", "/api/blog", "/api/categories"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn created_category_appears_in_list() {
    let app = app();

    let (status, body) = post(&app, "/api/categories", json!({ "name": "  Rust  " })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category added successfully");
    assert_eq!(body["category"]["id"], "3");
    assert_eq!(body["category"]["name"], "Rust");

    let (_, categories) = get(&app, "/api/categories").await;
    let last = categories.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["name"], "Rust");

    let (status, one) = get(&app, "/api/categories/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["name"], "Rust");
}

#[tokio::test]
async fn category_without_name_is_rejected() {
    let app = app();
    for body in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
        let (status, err) = post(&app, "/api/categories", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err, json!({ "error": "Category name is required." }));
    }
    let (_, categories) = get(&app, "/api/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn mistyped_field_gets_the_rule_message() {
    let app = app();
    let (status, err) = post(&app, "/api/categories", json!({ "name": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({ "error": "Category name is required." }));

    let (status, err) = post(
        &app,
        "/api/users",
        json!({ "username": ["ann"], "password": "pw", "email": "ann@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Username, password, and email are required.");
}

#[tokio::test]
async fn wrong_body_shape_does_not_leak_parser_text() {
    let app = app();
    let (status, err) = post(&app, "/api/blog", json!("just a string")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err, json!({ "error": "Invalid blog post data." }));

    let (status, err) = post(
        &app,
        "/api/blog",
        json!({ "title": "Hi", "content": long_content(), "authorId": "1", "tags": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid blog post data.");
}

#[tokio::test]
async fn json_body_is_read_whatever_the_content_type() {
    let app = app();
    for content_type in [None, Some("text/plain;charset=UTF-8")] {
        let mut builder = Request::builder().method(Method::POST).uri("/api/categories");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(r#"{"name":"Rust"}"#)).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{content_type:?}");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["category"]["name"], "Rust");
    }

    let (_, categories) = get(&app, "/api/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn null_lists_count_as_absent() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/blog",
        json!({ "title": "Hi", "content": long_content(), "authorId": "1", "tags": null }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post"]["tags"], json!([]));

    let (status, body) = post(
        &app,
        "/api/users",
        json!({ "username": "ann", "password": "pw", "email": "ann@example.com", "roles": null }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["roles"], json!([]));
}

#[tokio::test]
async fn unreadable_body_is_a_server_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body["error"],
        "Failed to create category. Please check server logs."
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/blog")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("title=hi"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn created_user_is_listed_without_password() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/users",
        json!({
            "username": "ann",
            "password": "hunter22",
            "email": "ann@example.com",
            "displayName": "Ann",
            "roles": "editor, admin"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User added successfully");
    assert_eq!(body["user"]["id"], "3");
    assert_eq!(body["user"]["roles"], json!(["editor", "admin"]));
    assert!(body["user"].get("password").is_none());

    let (_, users) = get(&app, "/api/users").await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password").is_none()));

    let (status, user) = get(&app, "/api/users/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["displayName"], "Ann");
}

#[tokio::test]
async fn user_requires_username_password_and_email() {
    let app = app();
    let (status, err) = post(
        &app,
        "/api/users",
        json!({ "username": "ann", "email": "ann@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Username, password, and email are required.");

    let (status, err) = post(
        &app,
        "/api/users",
        json!({ "username": "ann", "password": "pw", "email": "nope" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Email address is invalid.");
}

#[tokio::test]
async fn created_post_appears_with_resolved_labels() {
    let app = app();
    let (status, body) = post(
        &app,
        "/api/blog",
        json!({
            "title": "Ownership",
            "content": long_content(),
            "authorId": "2",
            "categoryId": "2",
            "tags": ["rust"],
            "coverImageUrl": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Blog post added successfully");
    assert_eq!(body["post"]["id"], "3");
    assert!(body["post"]["coverImageUrl"].is_null());

    let (_, posts) = get(&app, "/api/blog").await;
    assert_eq!(posts.as_array().unwrap().len(), 3);

    let (status, detail) = get(&app, "/api/blog/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["title"], "Ownership");
    assert_eq!(detail["authorName"], "Jane Doe");
    assert_eq!(detail["categoryName"], "Tech");
}

#[tokio::test]
async fn post_validation_messages() {
    let app = app();

    let (status, err) = post(&app, "/api/blog", json!({ "content": long_content(), "authorId": "1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Title is required.");

    let (status, err) = post(&app, "/api/blog", json!({ "title": "Hi", "content": "short", "authorId": "1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Content must be at least 50 characters.");

    let (status, err) = post(&app, "/api/blog", json!({ "title": "Hi", "content": long_content() })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Author is required.");
}

#[tokio::test]
async fn content_minimum_follows_config() {
    let app = create_router(AppState::new(AppConfig {
        min_content_length: 10,
        ..AppConfig::default()
    }));
    let (status, _) = post(
        &app,
        "/api/blog",
        json!({ "title": "Hi", "content": "ten chars!", "authorId": "1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn dangling_references_fall_back_to_labels() {
    let app = app();
    post(
        &app,
        "/api/blog",
        json!({
            "title": "Orphan",
            "content": long_content(),
            "authorId": "99",
            "categoryId": "42"
        }),
    )
    .await;

    let (_, detail) = get(&app, "/api/blog/3").await;
    assert_eq!(detail["authorName"], "Unknown");
    assert_eq!(detail["categoryName"], "Uncategorized");

    let (_, summaries) = get(&app, "/api/blog/summaries?search=orphan").await;
    assert_eq!(summaries.as_array().unwrap().len(), 1);
    assert_eq!(summaries[0]["authorName"], "Unknown");
    assert_eq!(summaries[0]["categoryName"], "Uncategorized");
}

#[tokio::test]
async fn summaries_trim_content() {
    let app = app();
    let (_, summaries) = get(&app, "/api/blog/summaries").await;
    let second = &summaries[1];
    assert_eq!(second["authorName"], "Jane Doe");
    let excerpt = second["excerpt"].as_str().unwrap();
    assert!(excerpt.ends_with("..."));
    assert_eq!(excerpt.chars().count(), 123);
}

#[tokio::test]
async fn blog_list_filters_and_sorts() {
    let app = app();

    let (_, by_tag) = get(&app, "/api/blog?tag=rust").await;
    assert_eq!(by_tag.as_array().unwrap().len(), 1);
    assert_eq!(by_tag[0]["id"], "2");

    let (_, by_author) = get(&app, "/api/blog?author=1").await;
    assert_eq!(by_author[0]["title"], "Welcome to NextBlog");

    let (_, by_category) = get(&app, "/api/blog?category=2").await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);

    let (_, newest) = get(&app, "/api/blog?sort=date&sort_by=desc&limit=1").await;
    assert_eq!(newest.as_array().unwrap().len(), 1);
    assert_eq!(newest[0]["id"], "2");

    let (status, err) = get(&app, "/api/blog?sort=popularity").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Invalid query parameters.");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    for uri in [
        "/api/users/99",
        "/api/blog/99",
        "/api/categories/99",
        "/api/blog/99/comments",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Resource not found");
    }
}

#[tokio::test]
async fn comments_are_kept_per_post() {
    let app = app();

    let (status, body) = post(
        &app,
        "/api/blog/1/comments",
        json!({ "userId": "2", "content": "Nice intro!" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["postId"], "1");

    post(&app, "/api/blog/2/comments", json!({ "userId": "1", "content": "Other post" })).await;
    post(&app, "/api/blog/1/comments", json!({ "userId": "77", "content": "Who am I" })).await;

    let (status, comments) = get(&app, "/api/blog/1/comments").await;
    assert_eq!(status, StatusCode::OK);
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["userName"], "Jane Doe");
    assert_eq!(comments[1]["userName"], "Unknown");

    let (status, err) = post(&app, "/api/blog/1/comments", json!({ "userId": "1", "content": " " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "Comment content is required.");

    let (status, _) = post(&app, "/api/blog/99/comments", json!({ "userId": "1", "content": "hi" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_share_an_id() {
    let app = empty_app();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                post(&app, "/api/categories", json!({ "name": format!("c{i}") })).await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        ids.insert(body["category"]["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids.len(), 32);

    let (_, categories) = get(&app, "/api/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 32);
}
