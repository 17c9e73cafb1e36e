//! HTTP scenario tests for the catalog crate
//! All tests run against the in-memory store and repositories.

use std::sync::Arc;

use auth::domain::repository::UserRepository;
use auth::models::{email::Email, user::User, user_role::UserRole};
use auth::{AuthConfig, InMemoryUserRepository, Principal, SessionManager};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use platform::kv::KvStore;
use platform::mail::{Mailer, OutgoingMail};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;

use crate::application::cache::{ALL_COURSES_KEY, ReadThroughCache};
use crate::domain::repository::CourseRepository;
use crate::infra::memory::InMemoryCatalogRepository;
use crate::presentation::router::catalog_router_generic;

struct TestApp {
    router: Router,
    repo: InMemoryCatalogRepository,
    users: InMemoryUserRepository,
    sessions: SessionManager,
    store: KvStore,
    outbox: mpsc::Receiver<OutgoingMail>,
}

fn app() -> TestApp {
    let store = KvStore::memory();
    let sessions = SessionManager::new(
        store.clone(),
        Arc::new(AuthConfig::new(
            "access", "refresh", "activation", "15m", "3d", false,
        )),
    );
    let repo = InMemoryCatalogRepository::new();
    let users = InMemoryUserRepository::new();
    let (mailer, outbox) = Mailer::channel();

    TestApp {
        router: catalog_router_generic(
            repo.clone(),
            users.clone(),
            sessions.clone(),
            ReadThroughCache::new(store.clone()),
            mailer,
        ),
        repo,
        users,
        sessions,
        store,
        outbox,
    }
}

/// Store a user, open a session for them and return the cookie header
async fn sign_in(app: &TestApp, email: &str, role: UserRole) -> (Principal, String) {
    let mut user = User::new("Test User", Email::new(email).unwrap(), None);
    user.set_role(role);
    app.users.create(&user).await.unwrap();

    let principal = Principal::from(&user);
    let issued = app.sessions.issue_session(&principal).await.unwrap();
    (principal, format!("access_token={}", issued.access_token))
}

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn course_draft(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Ownership, borrowing and lifetimes",
        "price": 49.0,
        "estimatedPrice": 79.0,
        "tags": "rust",
        "level": "Beginner",
        "demoUrl": "https://video.example.com/demo",
        "benefits": [{ "title": "Write safe code" }],
        "prerequisites": [{ "title": "Any language" }],
        "courseData": [{
            "title": "Intro",
            "description": "Getting started",
            "videoUrl": "https://video.example.com/1",
            "videoSection": "Basics",
            "videoLength": 12,
            "links": [{ "title": "Book", "url": "https://doc.rust-lang.org/book" }],
            "suggestion": "Install rustup first"
        }]
    })
}

/// Create a course as admin; returns its id and first content id
async fn create_course(app: &TestApp, admin: &str, name: &str) -> (String, String) {
    let response = send(
        app,
        request("POST", "/create-course", Some(admin), Some(course_draft(name))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let course = &body["course"];
    (
        course["id"].as_str().unwrap().to_string(),
        course["courseData"][0]["id"].as_str().unwrap().to_string(),
    )
}

async fn buy(app: &TestApp, cookie: &str, course_id: &str) -> Response<Body> {
    send(
        app,
        request(
            "POST",
            "/create-order",
            Some(cookie),
            Some(json!({ "courseId": course_id, "payment_info": { "id": "pi_123" } })),
        ),
    )
    .await
}

// ============================================================================
// Course reads and cache
// ============================================================================

#[tokio::test]
async fn test_public_course_is_a_preview() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;

    let response = send(&app, request("GET", &format!("/get-course/{course_id}"), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let section = &body["course"]["courseData"][0];
    assert_eq!(section["title"], "Intro");
    assert!(section.get("videoUrl").is_none());
    assert!(section.get("links").is_none());
    assert!(section.get("suggestion").is_none());
    assert!(section.get("questions").is_none());
}

#[tokio::test]
async fn test_cached_course_stays_stale_until_deleted() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;
    let uri = format!("/get-course/{course_id}");

    send(&app, request("GET", &uri, None, None)).await;
    assert!(app.store.get(&course_id).await.unwrap().is_some());
    assert_eq!(app.store.ttl(&course_id).await.unwrap(), None);

    let response = send(
        &app,
        request(
            "PUT",
            &format!("/edit-course/{course_id}"),
            Some(&admin),
            Some(course_draft("Rust 102")),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["course"]["name"], "Rust 102");

    let cached = body_json(send(&app, request("GET", &uri, None, None)).await).await;
    assert_eq!(cached["course"]["name"], "Rust 101");

    let response = send(
        &app,
        request("DELETE", &format!("/delete-course/{course_id}"), Some(&admin), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Course deleted successfully"
    );
    assert!(app.store.get(&course_id).await.unwrap().is_none());

    let response = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Course not found");
}

#[tokio::test]
async fn test_course_list_is_cached_under_sentinel_key() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    create_course(&app, &admin, "Rust 101").await;

    let body = body_json(send(&app, request("GET", "/get-courses", None, None)).await).await;
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);
    assert!(app.store.get(ALL_COURSES_KEY).await.unwrap().is_some());

    create_course(&app, &admin, "Rust 201").await;
    let body = body_json(send(&app, request("GET", "/get-courses", None, None)).await).await;
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);

    let all = body_json(send(&app, request("GET", "/get-all-courses", Some(&admin), None)).await).await;
    assert_eq!(all["courses"].as_array().unwrap().len(), 2);
    assert_eq!(all["courses"][0]["name"], "Rust 201");
}

#[tokio::test]
async fn test_delete_unknown_course() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;

    let response = send(
        &app,
        request(
            "DELETE",
            &format!("/delete-course/{}", uuid::Uuid::new_v4()),
            Some(&admin),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Course not found");
}

// ============================================================================
// Orders and entitlement
// ============================================================================

#[tokio::test]
async fn test_purchase_unlocks_content_without_new_login() {
    let mut app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (student, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;
    let content_uri = format!("/get-course-content/{course_id}");

    let response = send(&app, request("GET", &content_uri, Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "You are not eligible to access this course"
    );

    let response = buy(&app, &cookie, &course_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["order"]["courseId"], course_id.as_str());
    assert_eq!(body["order"]["payment_info"]["id"], "pi_123");

    let response = send(&app, request("GET", &content_uri, Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["content"][0]["videoUrl"], "https://video.example.com/1");

    let stored = app.users.find_by_id(&student.id).await.unwrap().unwrap();
    assert_eq!(stored.courses.len(), 1);

    let mail = app.outbox.recv().await.unwrap();
    assert_eq!(mail.to, "student@example.com");
    assert_eq!(mail.template, "order-confirmation");
    assert_eq!(mail.data["order"]["name"], "Rust 101");
    assert_eq!(mail.data["order"]["_id"], &course_id[..6]);

    let course_id = course_id.parse().unwrap();
    let course = CourseRepository::find_by_id(&app.repo, &course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(course.purchased, 1);
}

#[tokio::test]
async fn test_second_purchase_is_rejected() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;

    assert_eq!(buy(&app, &cookie, &course_id).await.status(), StatusCode::CREATED);

    let response = buy(&app, &cookie, &course_id).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "You have already purchased this course"
    );

    let orders = body_json(send(&app, request("GET", "/get-orders", Some(&admin), None)).await).await;
    assert_eq!(orders["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_purchase_of_unknown_course() {
    let app = app();
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;

    let response = buy(&app, &cookie, &uuid::Uuid::new_v4().to_string()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Course not found");
}

#[tokio::test]
async fn test_order_without_course_id_is_bad_request() {
    let app = app();
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;

    let response = send(
        &app,
        request(
            "POST",
            "/create-order",
            Some(&cookie),
            Some(json!({ "payment_info": { "id": "pi_123" } })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn test_purchase_survives_closed_mail_outbox() {
    let mut app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (student, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;
    app.outbox.close();

    let response = buy(&app, &cookie, &course_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let content_uri = format!("/get-course-content/{course_id}");
    let response = send(&app, request("GET", &content_uri, Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = app.users.find_by_id(&student.id).await.unwrap().unwrap();
    assert_eq!(stored.courses.len(), 1);
}

// ============================================================================
// Reviews
// ============================================================================

#[tokio::test]
async fn test_reviews_require_purchase_and_valid_rating() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;
    let uri = format!("/add-review/{course_id}");

    let response = send(
        &app,
        request("PUT", &uri, Some(&cookie), Some(json!({ "review": "Great", "rating": 4 }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    buy(&app, &cookie, &course_id).await;

    let response = send(
        &app,
        request("PUT", &uri, Some(&cookie), Some(json!({ "review": "Great", "rating": 6 }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Rating must be between 1 and 5"
    );

    let response = send(
        &app,
        request("PUT", &uri, Some(&cookie), Some(json!({ "review": "Great", "rating": 4 }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["course"]["ratings"], 4.0);
    let review_id = body["course"]["reviews"][0]["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        request(
            "PUT",
            "/add-reply",
            Some(&admin),
            Some(json!({ "comment": "Thanks!", "courseId": course_id, "reviewId": review_id })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["course"]["reviews"][0]["commentReplies"][0]["body"],
        "Thanks!"
    );
}

// ============================================================================
// Questions and answers
// ============================================================================

#[tokio::test]
async fn test_question_thread_notifies_and_mails() {
    let mut app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, content_id) = create_course(&app, &admin, "Rust 101").await;

    let response = send(
        &app,
        request(
            "PUT",
            "/add-question",
            Some(&cookie),
            Some(json!({ "question": "Why borrow?", "courseId": course_id, "contentId": content_id })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let question = &body["course"]["courseData"][0]["questions"][0];
    assert_eq!(question["question"], "Why borrow?");
    let question_id = question["id"].as_str().unwrap().to_string();

    let answer = |cookie: &str, text: &str| {
        request(
            "PUT",
            "/add-answer",
            Some(cookie),
            Some(json!({
                "answer": text,
                "courseId": course_id,
                "contentId": content_id,
                "questionId": question_id,
            })),
        )
    };

    let response = send(&app, answer(&admin, "To avoid copies")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mail = app.outbox.recv().await.unwrap();
    assert_eq!(mail.to, "student@example.com");
    assert_eq!(mail.template, "question-reply");
    assert_eq!(mail.data["title"], "Intro");

    let response = send(&app, answer(&cookie, "Got it")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.outbox.try_recv().is_err());

    let body = body_json(
        send(&app, request("GET", "/get-all-notifications", Some(&admin), None)).await,
    )
    .await;
    let titles: Vec<&str> = body["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|n| n["title"].as_str())
        .collect();
    assert_eq!(titles, ["Question Reply", "New Question"]);
}

#[tokio::test]
async fn test_question_on_unknown_content() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;

    let response = send(
        &app,
        request(
            "PUT",
            "/add-question",
            Some(&admin),
            Some(json!({ "question": "Hm?", "courseId": course_id, "contentId": "not-a-uuid" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid content id");

    let response = send(
        &app,
        request(
            "PUT",
            "/add-question",
            Some(&admin),
            Some(json!({
                "question": "Hm?",
                "courseId": course_id,
                "contentId": uuid::Uuid::new_v4().to_string(),
            })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Guards and notifications
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = app();
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;

    let response = send(&app, request("GET", "/get-orders", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("GET", "/get-orders", Some(&cookie), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        request("POST", "/create-course", Some(&cookie), Some(course_draft("Nope"))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, request("GET", "/get-course-content/x", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_notification_marks_read() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;
    let (_, cookie) = sign_in(&app, "student@example.com", UserRole::User).await;
    let (course_id, _) = create_course(&app, &admin, "Rust 101").await;
    buy(&app, &cookie, &course_id).await;

    let body = body_json(
        send(&app, request("GET", "/get-all-notifications", Some(&admin), None)).await,
    )
    .await;
    let notification = &body["notifications"][0];
    assert_eq!(notification["title"], "New Order");
    assert_eq!(notification["status"], "unread");
    let id = notification["id"].as_str().unwrap().to_string();

    let response = send(
        &app,
        request("PUT", &format!("/update-notification/{id}"), Some(&admin), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["notifications"][0]["status"], "read");

    let response = send(
        &app,
        request(
            "PUT",
            &format!("/update-notification/{}", uuid::Uuid::new_v4()),
            Some(&admin),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Notification not found");
}

#[tokio::test]
async fn test_create_course_validates_draft() {
    let app = app();
    let (_, admin) = sign_in(&app, "admin@example.com", UserRole::Admin).await;

    let response = send(
        &app,
        request(
            "POST",
            "/create-course",
            Some(&admin),
            Some(json!({ "name": " ", "price": 10.0 })),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Please enter the course name"
    );
}
