use super::{Executor, Params, QueryError, Statement};
use crate::models::{CreateStudentRequest, Student, StudentKey, UpdateStudentRequest};

const SELECT_STUDENT: &str = "SELECT email, firstname AS first_name, lastname AS last_name, \
     collegeyear AS college_year, bio, icon FROM Student";

pub async fn list_students(exec: &Executor) -> Result<Vec<Student>, QueryError> {
    let stmt = Statement::new("list_students", SELECT_STUDENT).then("ORDER BY email");
    exec.many(&stmt, &Params::new()).await
}

pub async fn find_student_by_email(
    exec: &Executor,
    email: &str,
) -> Result<Option<Student>, QueryError> {
    let stmt = Statement::new("find_student_by_email", SELECT_STUDENT).then("WHERE email = ${email}");
    exec.one_or_none(&stmt, &Params::new().with("email", email))
        .await
}

pub async fn create_student(
    exec: &Executor,
    req: &CreateStudentRequest,
) -> Result<StudentKey, QueryError> {
    let stmt = Statement::new(
        "create_student",
        "INSERT INTO Student(email, firstname, lastname, collegeyear, bio, icon) \
         VALUES (${email}, ${first_name}, ${last_name}, ${college_year}, ${bio}, ${icon}) \
         RETURNING email",
    );
    let params = Params::new()
        .with("email", req.email.as_str())
        .with("first_name", req.first_name.as_str())
        .with("last_name", req.last_name.as_str())
        .with("college_year", req.college_year)
        .with("bio", req.bio.as_deref())
        .with("icon", req.icon.as_deref());
    exec.one(&stmt, &params).await
}

/// Update the mutable profile fields; None when no student has `email`
pub async fn update_student(
    exec: &Executor,
    email: &str,
    req: &UpdateStudentRequest,
) -> Result<Option<StudentKey>, QueryError> {
    let stmt = Statement::new(
        "update_student",
        "UPDATE Student SET firstname = ${first_name}, lastname = ${last_name}, \
         collegeyear = ${college_year}, bio = ${bio}",
    )
    .then("WHERE email = ${email} RETURNING email");
    let params = Params::new()
        .with("email", email)
        .with("first_name", req.first_name.as_str())
        .with("last_name", req.last_name.as_str())
        .with("college_year", req.college_year)
        .with("bio", req.bio.as_deref());
    exec.one_or_none(&stmt, &params).await
}
