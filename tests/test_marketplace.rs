mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_listings_come_from_the_seeded_store() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("auth-a", "Ana").await;

    let (status, body) = app
        .request("GET", "/marketplace/organizers", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let id = body[0]["id"].as_str().unwrap().to_owned();
    let (status, organizer) = app
        .request("GET", &format!("/marketplace/organizers/{id}"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(organizer["id"].as_str().unwrap(), id);

    let (status, bundles) = app
        .request(
            "GET",
            &format!("/marketplace/organizers/{id}/bundles"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!bundles.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_organizer_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, token) = app.register_user("auth-a", "Ana").await;

    let (status, _) = app
        .request("GET", "/marketplace/organizers/nope", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_hiring_records_a_pending_request() {
    let app = TestApp::spawn().await;
    let (ana, token) = app.register_user("auth-a", "Ana").await;
    let (group, _) = app.create_group(&token, "Friday crew").await;

    let (status, body) = app
        .request(
            "POST",
            "/marketplace/hire",
            Some(&token),
            Some(json!({"organizerId": "1", "groupId": group, "message": "help us"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"].as_str().unwrap(), "pending");
    assert_eq!(body["userId"].as_i64().unwrap(), ana);
    assert_eq!(body["organizerId"].as_str().unwrap(), "1");

    let (status, _) = app
        .request(
            "POST",
            "/marketplace/hire",
            Some(&token),
            Some(json!({"organizerId": "nope", "groupId": group})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
