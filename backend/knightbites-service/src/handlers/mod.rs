/// HTTP handlers, one per (resource, operation)
///
/// Handlers validate the request shape, call one repository function and
/// hand the result to `response`. They never build SQL themselves.
pub mod attendees;
pub mod health;
pub mod posts;
pub mod restaurants;
pub mod students;

use crate::error::Result;
use actix_web::{web, HttpResponse};
use validator::Validate;

pub use attendees::{create_attendee, list_attendees, list_events};
pub use health::{health_summary, liveness_check};
pub use posts::{
    create_post, delete_post, get_post, list_post_details_by_meetup_time,
    list_post_details_by_post_time, list_posts,
};
pub use restaurants::list_restaurants;
pub use students::{create_student, get_student, list_student_posts, list_students, update_student};

/// Greeting served at the root path
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hello, Knights! Welcome to Knight Bites!")
}

/// Unwrap a JSON body and run its field validation
fn validated<T: Validate>(body: web::Json<T>) -> Result<T> {
    let body = body.into_inner();
    body.validate()?;
    Ok(body)
}
