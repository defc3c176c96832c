/// Knight Bites Service Library
///
/// HTTP API for the campus meal-meetup app: students post dining events at
/// restaurants and other students sign up to attend.
///
/// # Modules
///
/// - `routes`: the (verb, path) to handler table
/// - `handlers`: one handler per resource operation
/// - `response`: outcome to HTTP response mapping
/// - `db`: bound statement execution and the fixed statements per resource
/// - `models`: row types and validated request bodies
/// - `error`: error types and their HTTP rendering
/// - `config`: configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod response;
pub mod routes;

pub use config::{Config, PostSchema};
pub use db::Executor;
pub use error::{AppError, Result};

/// State shared by every handler.
///
/// Built once at startup and handed to actix as `web::Data`; handlers only
/// get shared references to it.
#[derive(Clone)]
pub struct AppState {
    executor: Executor,
    post_schema: PostSchema,
}

impl AppState {
    pub fn new(executor: Executor, post_schema: PostSchema) -> Self {
        Self {
            executor,
            post_schema,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn post_schema(&self) -> PostSchema {
        self.post_schema
    }
}
