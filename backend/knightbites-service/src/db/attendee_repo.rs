use super::{Executor, Params, QueryError, Statement};
use crate::models::{AttendeeDetail, EventAttendee};

/// Every signup, grouped by post
pub async fn list_events(exec: &Executor) -> Result<Vec<EventAttendee>, QueryError> {
    let stmt = Statement::new(
        "list_events",
        "SELECT postid AS post_id, studentemail AS student_email FROM EventAttendee",
    )
    .then("ORDER BY postid");
    exec.many(&stmt, &Params::new()).await
}

/// Attendees of one post with their display names
pub async fn list_attendees(exec: &Executor, post_id: i32) -> Result<Vec<AttendeeDetail>, QueryError> {
    let stmt = Statement::new(
        "list_attendees",
        "SELECT EventAttendee.postid AS post_id, EventAttendee.studentemail AS student_email, \
         Student.firstname AS first_name, Student.lastname AS last_name \
         FROM EventAttendee JOIN Student ON EventAttendee.studentemail = Student.email",
    )
    .then("WHERE EventAttendee.postid = ${post_id}")
    .then("ORDER BY Student.lastname, Student.firstname");
    exec.many(&stmt, &Params::new().with("post_id", post_id))
        .await
}

/// Sign a student up for a post's meetup.
///
/// Duplicate signups are left to the store's constraints.
pub async fn create_attendee(
    exec: &Executor,
    post_id: i32,
    student_email: &str,
) -> Result<EventAttendee, QueryError> {
    let stmt = Statement::new(
        "create_attendee",
        "INSERT INTO EventAttendee(postid, studentemail) VALUES (${post_id}, ${student_email}) \
         RETURNING postid AS post_id, studentemail AS student_email",
    );
    let params = Params::new()
        .with("post_id", post_id)
        .with("student_email", student_email);
    exec.one(&stmt, &params).await
}
