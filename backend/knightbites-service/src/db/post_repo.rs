use super::{Executor, Params, QueryError, Statement};
use crate::config::PostSchema;
use crate::models::{CreatePostRequest, Post, PostAuthorKey, PostDetail, PostKey};

const SELECT_POST_MEETUP: &str = "SELECT id, posttitle AS title, post AS body, posttime AS post_time, \
     meetuptime AS meetup_time, studentemail AS student_email, restaurantid AS restaurant_id \
     FROM Post";

const SELECT_POST_BASIC: &str = "SELECT id, posttitle AS title, post AS body, posttime AS post_time, \
     NULL::timestamptz AS meetup_time, studentemail AS student_email, NULL::integer AS restaurant_id \
     FROM Post";

const SELECT_DETAIL_MEETUP: &str = "SELECT Post.id, Post.posttitle AS title, Post.post AS body, \
     Post.posttime AS post_time, Post.meetuptime AS meetup_time, Post.studentemail AS student_email, \
     Post.restaurantid AS restaurant_id, Student.firstname AS first_name, Student.lastname AS last_name, \
     Restaurant.name AS restaurant_name \
     FROM Post \
     JOIN Student ON Post.studentemail = Student.email \
     JOIN Restaurant ON Post.restaurantid = Restaurant.restaurantid";

const SELECT_DETAIL_BASIC: &str = "SELECT Post.id, Post.posttitle AS title, Post.post AS body, \
     Post.posttime AS post_time, NULL::timestamptz AS meetup_time, Post.studentemail AS student_email, \
     NULL::integer AS restaurant_id, Student.firstname AS first_name, Student.lastname AS last_name, \
     NULL::text AS restaurant_name \
     FROM Post \
     JOIN Student ON Post.studentemail = Student.email";

const INSERT_POST_MEETUP: &str =
    "INSERT INTO Post(posttitle, post, posttime, meetuptime, studentemail, restaurantid) \
     VALUES (${title}, ${body}, ${post_time}, ${meetup_time}, ${student_email}, ${restaurant_id}) \
     RETURNING studentemail AS student_email";

const INSERT_POST_BASIC: &str = "INSERT INTO Post(posttitle, post, posttime, studentemail) \
     VALUES (${title}, ${body}, ${post_time}, ${student_email}) \
     RETURNING studentemail AS student_email";

/// Fixed sort keys of the joined post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOrder {
    PostTimeDesc,
    MeetupTimeAsc,
}

fn select_posts(name: &'static str, schema: PostSchema) -> Statement {
    match schema {
        PostSchema::Meetup => Statement::new(name, SELECT_POST_MEETUP),
        PostSchema::Basic => Statement::new(name, SELECT_POST_BASIC),
    }
}

/// All posts, newest first
pub async fn list_posts(exec: &Executor, schema: PostSchema) -> Result<Vec<Post>, QueryError> {
    let stmt = select_posts("list_posts", schema).then("ORDER BY posttime DESC");
    exec.many(&stmt, &Params::new()).await
}

/// Posts authored by one student, newest first
pub async fn list_posts_by_student(
    exec: &Executor,
    schema: PostSchema,
    email: &str,
) -> Result<Vec<Post>, QueryError> {
    let stmt = select_posts("list_posts_by_student", schema)
        .then("WHERE studentemail = ${email}")
        .then("ORDER BY posttime DESC");
    exec.many(&stmt, &Params::new().with("email", email)).await
}

/// Posts joined with author names and restaurant name.
///
/// Meetup-time ordering only exists under the meetup schema; the basic
/// schema falls back to post time.
pub async fn list_post_details(
    exec: &Executor,
    schema: PostSchema,
    order: DetailOrder,
) -> Result<Vec<PostDetail>, QueryError> {
    let stmt = match schema {
        PostSchema::Meetup => Statement::new("list_post_details", SELECT_DETAIL_MEETUP),
        PostSchema::Basic => Statement::new("list_post_details", SELECT_DETAIL_BASIC),
    };
    let stmt = match (order, schema) {
        (DetailOrder::MeetupTimeAsc, PostSchema::Meetup) => stmt.then("ORDER BY Post.meetuptime ASC"),
        _ => stmt.then("ORDER BY Post.posttime DESC"),
    };
    exec.many(&stmt, &Params::new()).await
}

pub async fn find_post_by_id(
    exec: &Executor,
    schema: PostSchema,
    id: i32,
) -> Result<Option<Post>, QueryError> {
    let stmt = select_posts("find_post_by_id", schema).then("WHERE id = ${id}");
    exec.one_or_none(&stmt, &Params::new().with("id", id)).await
}

/// Insert a post and return its author's email
pub async fn create_post(
    exec: &Executor,
    schema: PostSchema,
    req: &CreatePostRequest,
) -> Result<PostAuthorKey, QueryError> {
    let params = Params::new()
        .with("title", req.title.as_str())
        .with("body", req.body.as_str())
        .with("post_time", req.post_time)
        .with("student_email", req.student_email.as_str());

    let (stmt, params) = match schema {
        PostSchema::Meetup => (
            Statement::new("create_post", INSERT_POST_MEETUP),
            params
                .with("meetup_time", req.meetup_time)
                .with("restaurant_id", req.restaurant_id),
        ),
        PostSchema::Basic => (Statement::new("create_post", INSERT_POST_BASIC), params),
    };
    exec.one(&stmt, &params).await
}

/// Delete a post, returning its id when it existed
pub async fn delete_post(exec: &Executor, id: i32) -> Result<Option<PostKey>, QueryError> {
    let stmt = Statement::new("delete_post", "DELETE FROM Post WHERE id = ${id} RETURNING id");
    exec.one_or_none(&stmt, &Params::new().with("id", id)).await
}
