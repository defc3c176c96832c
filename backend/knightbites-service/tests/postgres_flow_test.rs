//! End-to-end flows against a real Postgres in a container.
//!
//! Run with: cargo test -p knightbites-service --test postgres_flow_test -- --ignored
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use knightbites_service::{routes, AppState, Executor, PostSchema};
use serde_json::{json, Value};

macro_rules! app {
    ($pool:expr, $schema:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(
                    Executor::new($pool.clone()),
                    $schema,
                )))
                .configure(routes::configure($schema)),
        )
        .await
    };
}

fn student(email: &str, first: &str, last: &str) -> Value {
    json!({
        "email": email,
        "firstName": first,
        "lastName": last,
        "collegeYear": 2,
        "bio": "",
        "icon": "i1"
    })
}

fn meetup_post(
    title: &str,
    email: &str,
    restaurant_id: i32,
    post_time: &str,
    meetup_time: &str,
) -> Value {
    json!({
        "title": title,
        "body": "Anyone want to join?",
        "postTime": post_time,
        "meetupTime": meetup_time,
        "studentEmail": email,
        "restaurantId": restaurant_id
    })
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn student_create_read_update() {
    let (_container, url) = common::start_postgres().await;
    let pool = common::migrated_pool(&url).await;
    let app = app!(pool, PostSchema::Meetup);

    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(student("a@x.edu", "A", "B"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created, json!({"email": "a@x.edu"}));

    let req = test::TestRequest::get().uri("/students/a@x.edu").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["firstName"], "A");
    assert_eq!(fetched["collegeYear"], 2);
    assert_eq!(fetched["icon"], "i1");

    let req = test::TestRequest::get().uri("/students").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = test::TestRequest::put()
        .uri("/students/a@x.edu")
        .set_json(json!({"firstName": "Ada", "lastName": "B", "collegeYear": 3, "bio": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/students/a@x.edu").to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["firstName"], "Ada");
    assert_eq!(fetched["collegeYear"], 3);
    assert_eq!(fetched["bio"], "hi");

    let req = test::TestRequest::get().uri("/students/nobody@x.edu").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/students/nobody@x.edu")
        .set_json(json!({"firstName": "N", "lastName": "B", "collegeYear": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Duplicate primary key is a store failure
    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(student("a@x.edu", "A", "B"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn post_lifecycle_with_attendees() {
    let (_container, url) = common::start_postgres().await;
    let pool = common::migrated_pool(&url).await;
    let restaurant_id = common::insert_restaurant(&pool, "Taco Spot").await;
    let app = app!(pool, PostSchema::Meetup);

    for (email, first, last) in [("a@x.edu", "A", "Zed"), ("b@x.edu", "B", "Young")] {
        let req = test::TestRequest::post()
            .uri("/students")
            .set_json(student(email, first, last))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    // Older post meets later, so the two orderings disagree
    for (title, post_time, meetup_time) in [
        ("Older", "2026-10-01T12:00:00Z", "2026-11-05T19:00:00Z"),
        ("Newer", "2026-10-02T12:00:00Z", "2026-11-01T19:00:00Z"),
    ] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(meetup_post(title, "a@x.edu", restaurant_id, post_time, meetup_time))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let key: Value = test::read_body_json(resp).await;
        assert_eq!(key, json!({"studentEmail": "a@x.edu"}));
    }

    let req = test::TestRequest::get().uri("/posts").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Newer");
    assert_eq!(posts[1]["title"], "Older");
    let post_id = posts[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post_id))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["restaurantId"], restaurant_id);

    let req = test::TestRequest::get().uri("/posts-details/posttime").to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details[0]["restaurantName"], "Taco Spot");
    assert_eq!(details[0]["lastName"], "Zed");

    let req = test::TestRequest::get().uri("/posts-details/meetuptime").to_request();
    let by_meetup: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(by_meetup[0]["title"], "Newer");
    assert_eq!(by_meetup[1]["title"], "Older");

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(meetup_post(
            "Other author",
            "b@x.edu",
            restaurant_id,
            "2026-10-03T12:00:00Z",
            "2026-11-03T19:00:00Z",
        ))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/students/a@x.edu/posts").to_request();
    let authored: Value = test::call_and_read_body_json(&app, req).await;
    let authored = authored.as_array().unwrap();
    assert_eq!(authored.len(), 2);
    assert!(authored.iter().all(|p| p["studentEmail"] == "a@x.edu"));

    let req = test::TestRequest::get().uri("/students/b@x.edu/posts").to_request();
    let authored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(authored.as_array().unwrap().len(), 1);
    assert_eq!(authored[0]["title"], "Other author");

    let req = test::TestRequest::get().uri("/posts").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let attendees_uri = format!("/attendees/{}", post_id);
    let req = test::TestRequest::get().uri(&attendees_uri).to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;
    assert!(before.as_array().unwrap().is_empty());

    let req = test::TestRequest::post()
        .uri(&attendees_uri)
        .set_json(json!({"studentEmail": "b@x.edu"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let signup: Value = test::read_body_json(resp).await;
    assert_eq!(signup, json!({"postId": post_id, "studentEmail": "b@x.edu"}));

    // Same pair again is refused by the composite key
    let req = test::TestRequest::post()
        .uri(&attendees_uri)
        .set_json(json!({"studentEmail": "b@x.edu"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "internal server error", "status": 500}));

    let req = test::TestRequest::get().uri(&attendees_uri).to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after.as_array().unwrap().len(), 1);
    assert_eq!(after[0]["firstName"], "B");

    let req = test::TestRequest::get().uri("/events").to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(events.as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted, json!({"id": post_id}));

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Signups went with the post
    let req = test::TestRequest::get().uri("/events").to_request();
    let events: Value = test::call_and_read_body_json(&app, req).await;
    assert!(events.as_array().unwrap().is_empty());
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn post_for_unknown_student_is_server_error() {
    let (_container, url) = common::start_postgres().await;
    let pool = common::migrated_pool(&url).await;
    let restaurant_id = common::insert_restaurant(&pool, "Pho Place").await;
    let app = app!(pool, PostSchema::Meetup);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(meetup_post(
            "Orphan",
            "ghost@x.edu",
            restaurant_id,
            "2026-10-01T12:00:00Z",
            "2026-11-01T19:00:00Z",
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "internal server error", "status": 500}));
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn basic_schema_reports_null_meetup_fields() {
    let (_container, url) = common::start_postgres().await;
    let pool = common::migrated_pool(&url).await;
    let app = app!(pool, PostSchema::Basic);

    let req = test::TestRequest::post()
        .uri("/students")
        .set_json(student("a@x.edu", "A", "B"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({
            "title": "Lunch",
            "body": "Union at noon",
            "postTime": "2026-10-01T12:00:00Z",
            "studentEmail": "a@x.edu"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/posts-details/posttime").to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details[0]["title"], "Lunch");
    assert!(details[0]["meetupTime"].is_null());
    assert!(details[0]["restaurantName"].is_null());
}

#[actix_web::test]
#[ignore = "Requires Docker"]
async fn health_reports_ok_with_live_store() {
    let (_container, url) = common::start_postgres().await;
    let pool = common::migrated_pool(&url).await;
    let app = app!(pool, PostSchema::Meetup);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
