use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use knightbites_service::config::{Config, SERVICE_NAME};
use knightbites_service::{routes, AppState, Executor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_log_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Knight Bites Service
///
/// Serves the posts, students, restaurants and attendees routes on `PORT`
/// (default 3000) against the PostgreSQL database described by the `DB_*`
/// or `DATABASE_URL` environment variables.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;
    init_tracing(&config);

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!(
        env = %config.app.env,
        post_schema = %config.post_schema,
        diagnostics = config.log.diagnostics,
        "Configuration loaded"
    );

    let db_config = DbConfig::from_env(SERVICE_NAME)
        .map_err(anyhow::Error::msg)
        .context("Failed to load database configuration")?;
    db_config.log_config();
    let pool = create_pool(db_config)
        .await
        .context("Failed to create database pool")?;

    let state = web::Data::new(AppState::new(Executor::new(pool), config.post_schema));
    let schema = config.post_schema;
    let allowed_origins = config.cors.allowed_origins.clone();

    let bind_address = (config.app.host.clone(), config.app.port);
    tracing::info!("Starting HTTP server at {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(routes::configure(schema))
    })
    .bind(bind_address)?
    .run()
    .await?;

    tracing::info!("{} stopped", SERVICE_NAME);
    Ok(())
}
