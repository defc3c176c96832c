/// Post handlers - HTTP endpoints for post operations
use super::validated;
use crate::db::post_repo::{self, DetailOrder};
use crate::error::{AppError, Result};
use crate::models::CreatePostRequest;
use crate::response;
use crate::AppState;
use actix_web::{web, HttpResponse};

/// List all posts, newest first
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = post_repo::list_posts(state.executor(), state.post_schema()).await?;
    Ok(response::many(posts))
}

/// GET /posts-details/posttime
pub async fn list_post_details_by_post_time(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts =
        post_repo::list_post_details(state.executor(), state.post_schema(), DetailOrder::PostTimeDesc)
            .await?;
    Ok(response::many(posts))
}

/// GET /posts-details/meetuptime (meetup schema only)
pub async fn list_post_details_by_meetup_time(
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let posts =
        post_repo::list_post_details(state.executor(), state.post_schema(), DetailOrder::MeetupTimeAsc)
            .await?;
    Ok(response::many(posts))
}

/// Get a post by ID
pub async fn get_post(state: web::Data<AppState>, post_id: web::Path<i32>) -> Result<HttpResponse> {
    let post =
        post_repo::find_post_by_id(state.executor(), state.post_schema(), post_id.into_inner())
            .await?;
    response::one_or_404(post)
}

/// Create a new post; responds with the author's email
pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = validated(req)?;
    if state.post_schema().has_meetup_columns()
        && (req.meetup_time.is_none() || req.restaurant_id.is_none())
    {
        return Err(AppError::Validation(
            "meetupTime and restaurantId are required".to_string(),
        ));
    }

    let key = post_repo::create_post(state.executor(), state.post_schema(), &req).await?;
    tracing::info!(student_email = %key.student_email, "post created");
    Ok(response::written(key))
}

/// Delete a post; responds with its id
pub async fn delete_post(
    state: web::Data<AppState>,
    post_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let deleted = post_repo::delete_post(state.executor(), post_id.into_inner()).await?;
    if let Some(key) = &deleted {
        tracing::info!(post_id = key.id, "post deleted");
    }
    response::one_or_404(deleted)
}
