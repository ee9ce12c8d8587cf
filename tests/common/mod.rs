use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use kudu::{api_routes, auth::create_token, get_router, users::Profile, AppState, Config};

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let state = AppState::new(Config::stub(), None);
        state.primary_database.run_migrations().await;
        let router = get_router(state.clone(), api_routes(state.clone()));
        Self { state, router }
    }

    /// Seeds a profile and mints a bearer token for it.
    pub async fn register_user(&self, auth_id: &str, name: &str) -> (i64, String) {
        let profile = Profile::create(&self.state.primary_database, auth_id, name)
            .await
            .expect("profile insert failed");
        let token = create_token(
            auth_id,
            &format!("{auth_id}@kudu.app"),
            name,
            self.state.domain(),
            &self.state.keys.encoding,
        )
        .expect("token creation failed");
        (profile.pk, token)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(build_request(method, uri, token, body))
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body read failed")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Creates a group through the API and returns (group id, invite token).
    pub async fn create_group(&self, token: &str, name: &str) -> (i64, String) {
        let (status, body) = self
            .request(
                "POST",
                "/groups",
                Some(token),
                Some(json!({"name": name, "description": "weekly plans"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "group creation failed: {body}");
        (
            body["id"].as_i64().expect("group id"),
            body["inviteToken"].as_str().expect("invite token").to_owned(),
        )
    }

    pub async fn join_group(&self, token: &str, invite_token: &str) {
        let (status, body) = self
            .request(
                "POST",
                &format!("/groups/join/{invite_token}"),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "join failed: {body}");
    }

    pub async fn seed_president(&self, group: i64, user: i64, week_start: NaiveDate) {
        sqlx::query(
            "INSERT INTO group_presidents (group_pk, user_pk, week_start_date, week_end_date)
                VALUES ($1, $2, $3, $4);",
        )
        .bind(group)
        .bind(user)
        .bind(week_start)
        .bind(week_start + Duration::days(6))
        .execute(self.state.primary_database.get_connection())
        .await
        .expect("president seed failed");
    }

    pub async fn count_rows(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql)
            .fetch_one(self.state.primary_database.get_connection())
            .await
            .expect("count query failed")
    }
}

pub fn build_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    }
}
