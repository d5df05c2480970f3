//! Call Intelligence Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use call_intel_lib::api::{self, ApiDoc};
use call_intel_lib::auth::{FixedIdentity, SharedIdentity};
use call_intel_lib::config::Config;
use call_intel_lib::db::DbPool;
use call_intel_lib::middleware::RequestLogger;
use call_intel_lib::services::{
    AnalysisDispatch, DocumentLibrary, DocumentStore, EventBroadcaster, IngestionWorkflow,
    Notifier, ObjectStore, RecordStore, StatusReconciler, Storage,
};

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<PathBuf>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static dir not configured"))?;
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

/// Log a fatal startup error and exit.
fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    error!("{}: {}", context, err);
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // --health-check is used by Docker HEALTHCHECK
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL, S3 credentials and CIS_WEBHOOK_URL must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Call Intelligence Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!(
            "All requests are attributed to {} ({})",
            config.identity.email, config.identity.user_id
        );
    }

    let pool = match DbPool::new(&config).await {
        Ok(pool) => pool,
        Err(e) => fail("Failed to initialize database", e),
    };
    if let Err(e) = pool.run_migrations().await {
        fail("Failed to run migrations", e);
    }

    let storage = match Storage::new(&config.storage).await {
        Ok(storage) => storage,
        Err(e) => fail("Failed to initialize S3 storage", e),
    };

    let notifier = match Notifier::from_settings(&config.webhook) {
        Ok(notifier) => notifier,
        Err(e) => fail("Failed to build webhook client", e),
    };
    info!("Analysis webhook: {}", notifier.endpoint());

    // Shared state
    let broadcaster = EventBroadcaster::new();
    let identity: SharedIdentity = Arc::new(FixedIdentity::from_settings(&config.identity));
    let store: Arc<dyn RecordStore> = Arc::new(pool.clone());
    let objects: Arc<dyn ObjectStore> = Arc::new(storage);
    let dispatch: Arc<dyn AnalysisDispatch> = Arc::new(notifier);

    let ingestion = IngestionWorkflow::new(
        store.clone(),
        objects.clone(),
        dispatch.clone(),
        broadcaster.clone(),
        config.max_recording_size,
    );
    let reconciler = StatusReconciler::new(store, dispatch, broadcaster.clone());
    let document_store: Arc<dyn DocumentStore> = Arc::new(pool.clone());
    let documents = DocumentLibrary::new(document_store, objects.clone(), config.max_document_size);

    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();

    info!(
        "Upload limits: recordings {}MB, documents {}MB",
        config.max_recording_size / 1024 / 1024,
        config.max_document_size / 1024 / 1024
    );

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    let server = HttpServer::new(move || {
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_origin("http://localhost:5173")
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            // CORS must wrap before other middleware
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(identity.clone()))
            .app_data(web::Data::new(objects.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(ingestion.clone()))
            .app_data(web::Data::new(reconciler.clone()))
            .app_data(web::Data::new(documents.clone()))
            .app_data(web::JsonConfig::default().limit(2 * 1024 * 1024))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_routes)
                    .configure(api::configure_websocket_routes),
            )
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", ApiDoc::openapi()),
            );

        // Serve the front-end build when CIS_STATIC_DIR is set
        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .service(Files::new("/favicon", dir.clone()).index_file("favicon.ico"))
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
