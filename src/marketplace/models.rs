use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: u32,
    pub duration: String,
    pub tags: Vec<String>,
    pub is_active: bool,
}

/// A professional organizer for hire, with pre-packaged activity bundles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: String,
    pub name: String,
    pub bio: String,
    pub hourly_rate: u32,
    pub rating: f32,
    pub review_count: u32,
    pub skills: Vec<String>,
    pub availability: String,
    pub bundles: Vec<Bundle>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HireRequest {
    pub id: String,
    pub organizer_id: String,
    pub group_id: i64,
    pub user_id: i64,
    pub message: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}
