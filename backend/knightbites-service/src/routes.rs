/// Route table: (verb, path) to handler
///
/// Also installs the extractor configs so malformed bodies become 400s and
/// unparseable ids on `/posts/{id}` become 404s, both through `AppError`.
use crate::config::PostSchema;
use crate::error::AppError;
use crate::{handlers, metrics};
use actix_web::web;

/// Largest accepted JSON body
const JSON_LIMIT_BYTES: usize = 64 * 1024;

pub fn configure(schema: PostSchema) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config())
            .route("/", web::get().to(handlers::hello))
            .route("/health", web::get().to(handlers::health_summary))
            .route("/health/live", web::get().to(handlers::liveness_check))
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .service(
                web::resource("/posts")
                    .route(web::get().to(handlers::list_posts))
                    .route(web::post().to(handlers::create_post)),
            )
            .service(
                web::resource("/posts/{id}")
                    .app_data(post_id_config())
                    .route(web::get().to(handlers::get_post))
                    .route(web::delete().to(handlers::delete_post)),
            )
            .route(
                "/posts-details/posttime",
                web::get().to(handlers::list_post_details_by_post_time),
            );

        if schema.has_meetup_columns() {
            cfg.route(
                "/posts-details/meetuptime",
                web::get().to(handlers::list_post_details_by_meetup_time),
            );
        }

        cfg.service(
            web::resource("/students")
                .route(web::get().to(handlers::list_students))
                .route(web::post().to(handlers::create_student)),
        )
        .service(
            web::resource("/students/{email}")
                .route(web::get().to(handlers::get_student))
                .route(web::put().to(handlers::update_student)),
        )
        .route(
            "/students/{email}/posts",
            web::get().to(handlers::list_student_posts),
        )
        .route("/restaurants", web::get().to(handlers::list_restaurants))
        .route("/events", web::get().to(handlers::list_events))
        .service(
            web::resource("/attendees/{post_id}")
                .route(web::get().to(handlers::list_attendees))
                .route(web::post().to(handlers::create_attendee)),
        );
    }
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

/// A post id that is not an integer cannot name a post
fn post_id_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "unparseable path parameter");
        AppError::NotFound.into()
    })
}
