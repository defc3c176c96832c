use super::validated;
use crate::db::{post_repo, student_repo};
use crate::error::Result;
use crate::models::{CreateStudentRequest, UpdateStudentRequest};
use crate::response;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_students(state: web::Data<AppState>) -> Result<HttpResponse> {
    let students = student_repo::list_students(state.executor()).await?;
    Ok(response::many(students))
}

pub async fn get_student(state: web::Data<AppState>, email: web::Path<String>) -> Result<HttpResponse> {
    let student = student_repo::find_student_by_email(state.executor(), &email).await?;
    response::one_or_404(student)
}

/// Posts written by one student, newest first
pub async fn list_student_posts(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse> {
    let posts =
        post_repo::list_posts_by_student(state.executor(), state.post_schema(), &email).await?;
    Ok(response::many(posts))
}

pub async fn create_student(
    state: web::Data<AppState>,
    req: web::Json<CreateStudentRequest>,
) -> Result<HttpResponse> {
    let req = validated(req)?;
    let key = student_repo::create_student(state.executor(), &req).await?;
    tracing::info!(email = %key.email, "student created");
    Ok(response::written(key))
}

/// Update name, year and bio; 404 when the email is unknown
pub async fn update_student(
    state: web::Data<AppState>,
    email: web::Path<String>,
    req: web::Json<UpdateStudentRequest>,
) -> Result<HttpResponse> {
    let req = validated(req)?;
    let key = student_repo::update_student(state.executor(), &email, &req).await?;
    response::one_or_404(key)
}
