mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;
use kudu::president::WeekWindow;

/// Group where Ana is owner and this week's president, with Bob as a second
/// member. Returns (group id, ana pk, ana token, bob pk, bob token).
async fn president_fixture(app: &TestApp) -> (i64, i64, String, i64, String) {
    let (ana, ana_token) = app.register_user("auth-a", "Ana").await;
    let (bob, bob_token) = app.register_user("auth-b", "Bob").await;
    let (group, invite) = app.create_group(&ana_token, "Friday crew").await;
    app.join_group(&bob_token, &invite).await;
    app.seed_president(group, ana, WeekWindow::current().start).await;
    (group, ana, ana_token, bob, bob_token)
}

async fn create_activity(app: &TestApp, group: i64, token: &str, title: &str) -> Value {
    let (status, body) = app
        .request(
            "POST",
            &format!("/groups/{group}/activities"),
            Some(token),
            Some(json!({"title": title, "description": "bring snacks"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "activity creation failed: {body}");
    body
}

#[tokio::test]
async fn test_only_the_president_creates_activities() {
    let app = TestApp::spawn().await;
    let (group, ana, ana_token, _, bob_token) = president_fixture(&app).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/groups/{group}/activities"),
            Some(&bob_token),
            Some(json!({"title": "Bowling"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("president"));

    let activity = create_activity(&app, group, &ana_token, "Bowling").await;
    assert_eq!(activity["author"].as_str().unwrap(), "Ana");
    assert_eq!(activity["createdBy"].as_i64().unwrap(), ana);
    assert!(activity["isOwner"].as_bool().unwrap());
    assert_eq!(activity["rsvpYesCount"].as_i64().unwrap(), 0);
    assert_eq!(activity["totalRsvpCount"].as_i64().unwrap(), 0);
    assert!(activity["userRsvp"].is_null());
}

#[tokio::test]
async fn test_activity_title_is_required() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, _, _) = president_fixture(&app).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/groups/{group}/activities"),
            Some(&ana_token),
            Some(json!({"title": "  "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"].as_str().unwrap(), "Activity title is required");
}

#[tokio::test]
async fn test_only_the_creator_edits_or_deletes() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, _, bob_token) = president_fixture(&app).await;
    let activity = create_activity(&app, group, &ana_token, "Bowling").await;
    let uri = format!("/groups/{group}/activities/{}", activity["id"]);

    let update = json!({"title": "Karting", "description": "faster"});
    let (status, body) = app
        .request("PUT", &uri, Some(&bob_token), Some(update.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("only edit activities you created"));

    let (status, _) = app.request("DELETE", &uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .request("PUT", &uri, Some(&ana_token), Some(update))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"].as_str().unwrap(), "Karting");

    let (status, _) = app.request("DELETE", &uri, Some(&ana_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, list) = app
        .request("GET", &format!("/groups/{group}/activities"), Some(&ana_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_past_presidents_keep_edit_rights_over_their_activities() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, bob, _) = president_fixture(&app).await;
    let activity = create_activity(&app, group, &ana_token, "Bowling").await;

    // Ana's term ends; Bob holds the next week. Her activity stays hers.
    let database = app.state.primary_database.get_connection();
    sqlx::query("DELETE FROM group_presidents;")
        .execute(database)
        .await
        .unwrap();
    app.seed_president(group, bob, WeekWindow::current().start).await;

    let uri = format!("/groups/{group}/activities/{}", activity["id"]);
    let (status, body) = app
        .request("PUT", &uri, Some(&ana_token), Some(json!({"title": "Still bowling"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"].as_str().unwrap(), "Still bowling");
}

#[tokio::test]
async fn test_rsvp_upsert_removal_and_counts() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, bob, bob_token) = president_fixture(&app).await;
    let activity = create_activity(&app, group, &ana_token, "Bowling").await;
    let id = activity["id"].as_i64().unwrap();
    let rsvp_uri = format!("/groups/{group}/activities/{id}/rsvp");
    let rsvps_uri = format!("/groups/{group}/activities/{id}/rsvps");

    let (status, _) = app
        .request("POST", &rsvp_uri, Some(&bob_token), Some(json!({"response": "yes"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = app.request("GET", &rsvps_uri, Some(&ana_token), None).await;
    assert_eq!(listing["totalYes"].as_i64().unwrap(), 1);
    assert_eq!(listing["totalNo"].as_i64().unwrap(), 0);
    assert_eq!(listing["yes"][0]["userName"].as_str().unwrap(), "Bob");
    assert_eq!(listing["yes"][0]["userId"].as_i64().unwrap(), bob);

    // Last write wins: switching to "no" leaves a single row.
    let (status, _) = app
        .request("POST", &rsvp_uri, Some(&bob_token), Some(json!({"response": "no"})))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = app.request("GET", &rsvps_uri, Some(&ana_token), None).await;
    assert_eq!(listing["totalYes"].as_i64().unwrap(), 0);
    assert_eq!(listing["totalNo"].as_i64().unwrap(), 1);
    let rows = app.count_rows("SELECT COUNT(*) FROM activity_rsvps").await;
    assert_eq!(rows, 1);

    // The caller's own response shows up in the activity list.
    let (_, list) = app
        .request("GET", &format!("/groups/{group}/activities"), Some(&bob_token), None)
        .await;
    assert_eq!(list[0]["userRsvp"].as_str().unwrap(), "no");
    assert_eq!(list[0]["rsvpNoCount"].as_i64().unwrap(), 1);

    let (status, _) = app.request("DELETE", &rsvp_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, listing) = app.request("GET", &rsvps_uri, Some(&ana_token), None).await;
    assert_eq!(listing["totalYes"].as_i64().unwrap(), 0);
    assert_eq!(listing["totalNo"].as_i64().unwrap(), 0);

    // Removal is idempotent.
    let (status, _) = app.request("DELETE", &rsvp_uri, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rsvp_rejects_values_outside_yes_no() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, _, _) = president_fixture(&app).await;
    let activity = create_activity(&app, group, &ana_token, "Bowling").await;

    let (status, _) = app
        .request(
            "POST",
            &format!("/groups/{group}/activities/{}/rsvp", activity["id"]),
            Some(&ana_token),
            Some(json!({"response": "maybe"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rsvp_on_unknown_activity_is_not_found() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, _, _) = president_fixture(&app).await;

    let (status, body) = app
        .request(
            "POST",
            &format!("/groups/{group}/activities/9999/rsvp"),
            Some(&ana_token),
            Some(json!({"response": "yes"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"].as_str().unwrap(), "Activity not found");
}

#[tokio::test]
async fn test_rsvps_are_listed_in_response_order() {
    let app = TestApp::spawn().await;
    let (group, _, ana_token, _, bob_token) = president_fixture(&app).await;
    let (_, cleo_token) = app.register_user("auth-c", "Cleo").await;
    let (_, detail) = app
        .request("GET", &format!("/groups/{group}"), Some(&ana_token), None)
        .await;
    let invite = detail["inviteToken"].as_str().unwrap().to_owned();
    app.join_group(&cleo_token, &invite).await;

    let activity = create_activity(&app, group, &ana_token, "Bowling").await;
    let id = activity["id"].as_i64().unwrap();
    let rsvp_uri = format!("/groups/{group}/activities/{id}/rsvp");

    // Spread the writes so created_at ordering is observable.
    let conn = app.state.primary_database.get_connection();
    for (token, response, offset) in [
        (&bob_token, "yes", 3i64),
        (&cleo_token, "yes", 2),
        (&ana_token, "no", 1),
    ] {
        let (status, _) = app
            .request("POST", &rsvp_uri, Some(token), Some(json!({"response": response})))
            .await;
        assert_eq!(status, StatusCode::OK);
        // Backdate so each row gets a distinct creation instant.
        sqlx::query(
            "UPDATE activity_rsvps SET created_at = datetime('now', '-' || $1 || ' seconds')
                WHERE created_at = (SELECT MAX(created_at) FROM activity_rsvps);",
        )
        .bind(offset)
        .execute(conn)
        .await
        .unwrap();
    }

    let (_, listing) = app
        .request(
            "GET",
            &format!("/groups/{group}/activities/{id}/rsvps"),
            Some(&ana_token),
            None,
        )
        .await;
    assert_eq!(listing["totalYes"].as_i64().unwrap(), 2);
    assert_eq!(listing["totalNo"].as_i64().unwrap(), 1);
    assert_eq!(listing["yes"][0]["userName"].as_str().unwrap(), "Bob");
    assert_eq!(listing["yes"][1]["userName"].as_str().unwrap(), "Cleo");
    assert_eq!(listing["no"][0]["userName"].as_str().unwrap(), "Ana");
}
