/// Attendee handlers - meetup signups per post
///
/// The post id stays a raw path segment here: a listing for an id that is
/// not an integer is empty, and a signup for one fails like any other
/// signup the store would refuse.
use super::validated;
use crate::db::attendee_repo;
use crate::error::{AppError, Result};
use crate::models::{AttendeeDetail, CreateAttendeeRequest};
use crate::response;
use crate::AppState;
use actix_web::{web, HttpResponse};

/// GET /events - all signups ordered by post
pub async fn list_events(state: web::Data<AppState>) -> Result<HttpResponse> {
    let events = attendee_repo::list_events(state.executor()).await?;
    Ok(response::many(events))
}

pub async fn list_attendees(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    let attendees = match post_id.parse::<i32>() {
        Ok(post_id) => attendee_repo::list_attendees(state.executor(), post_id).await?,
        Err(_) => Vec::<AttendeeDetail>::new(),
    };
    Ok(response::many(attendees))
}

/// Sign up for a post; the post id comes from the path, the student from the body
pub async fn create_attendee(
    state: web::Data<AppState>,
    post_id: web::Path<String>,
    req: web::Json<CreateAttendeeRequest>,
) -> Result<HttpResponse> {
    let req = validated(req)?;
    let post_id = post_id.parse::<i32>().map_err(|e| {
        AppError::Internal(format!("signup post id {:?}: {}", post_id.as_str(), e))
    })?;

    let attendee =
        attendee_repo::create_attendee(state.executor(), post_id, &req.student_email).await?;
    tracing::info!(
        post_id = attendee.post_id,
        student_email = %attendee.student_email,
        "attendee signed up"
    );
    Ok(response::written(attendee))
}
