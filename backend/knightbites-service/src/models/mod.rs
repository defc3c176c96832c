/// Data models for knightbites-service
///
/// Row types decode from the column aliases used in `db`; every JSON body
/// uses camelCase keys.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A student's dining event post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub post_time: DateTime<Utc>,
    /// Always null under the basic Post schema
    pub meetup_time: Option<DateTime<Utc>>,
    pub student_email: String,
    /// Always null under the basic Post schema
    pub restaurant_id: Option<i32>,
}

/// Post joined with its author and restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub post: Post,
    pub first_name: String,
    pub last_name: String,
    pub restaurant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub college_year: i32,
    pub bio: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub restaurant_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub cuisine: Option<String>,
}

/// One student's signup for one post's meetup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendee {
    pub post_id: i32,
    pub student_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeDetail {
    pub post_id: i32,
    pub student_email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Key returned by post creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthorKey {
    pub student_email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PostKey {
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudentKey {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub post_time: DateTime<Utc>,
    pub meetup_time: Option<DateTime<Utc>>,
    #[validate(email)]
    pub student_email: String,
    pub restaurant_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(email)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub college_year: i32,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub college_year: i32,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendeeRequest {
    #[validate(email)]
    pub student_email: String,
}
