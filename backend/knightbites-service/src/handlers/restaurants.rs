use crate::db::restaurant_repo;
use crate::error::Result;
use crate::response;
use crate::AppState;
use actix_web::{web, HttpResponse};

pub async fn list_restaurants(state: web::Data<AppState>) -> Result<HttpResponse> {
    let restaurants = restaurant_repo::list_restaurants(state.executor()).await?;
    Ok(response::many(restaurants))
}
