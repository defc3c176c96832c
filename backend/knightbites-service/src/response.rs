/// Uniform mapping from executor outcomes to HTTP responses
///
/// Reads answer 200 with a JSON object or array, or 404 when a point lookup
/// found nothing. Writes answer 200 (not 201) with the identifying fields of
/// the affected row. Failures are rendered by `AppError`.
use crate::error::{AppError, Result};
use actix_web::HttpResponse;
use serde::Serialize;

/// 200 with the row, or 404 with an empty body
pub fn one_or_404<T: Serialize>(row: Option<T>) -> Result<HttpResponse> {
    match row {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Err(AppError::NotFound),
    }
}

/// 200 with the rows; an empty listing is still a 200
pub fn many<T: Serialize>(rows: Vec<T>) -> HttpResponse {
    HttpResponse::Ok().json(rows)
}

/// 200 with the key fields returned by a write
pub fn written<T: Serialize>(key: T) -> HttpResponse {
    HttpResponse::Ok().json(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn missing_row_is_not_found() {
        let err = one_or_404::<i32>(None).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn present_row_is_ok() {
        let resp = one_or_404(Some(serde_json::json!({"email": "a@x.edu"}))).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn empty_listing_is_ok() {
        assert_eq!(many::<i32>(Vec::new()).status(), StatusCode::OK);
    }
}
