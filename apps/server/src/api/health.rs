//! Liveness and readiness endpoints.
//!
//! `/health` only says the process is serving. `/ready` checks what an
//! ingestion needs before it can succeed: the database and both buckets.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::services::{ObjectStore, StorageBucket};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

/// One dependency probed by `/ready`.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct DependencyCheck {
    name: &'static str,
    ok: bool,
}

impl DependencyCheck {
    fn from_result(name: &'static str, result: AppResult<()>) -> Self {
        if let Err(e) = &result {
            warn!(dependency = name, "Readiness check failed: {}", e);
        }
        Self {
            name,
            ok: result.is_ok(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    checks: Vec<DependencyCheck>,
}

impl ReadyResponse {
    /// Ready only when every check passed.
    fn from_checks(checks: Vec<DependencyCheck>) -> (StatusCode, Self) {
        if checks.iter().all(|c| c.ok) {
            (
                StatusCode::OK,
                Self {
                    status: "ready",
                    checks,
                },
            )
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Self {
                    status: "not_ready",
                    checks,
                },
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Process is serving", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

async fn ping_database(pool: &DbPool) -> AppResult<()> {
    let stmt =
        sea_orm::Statement::from_string(sea_orm::DatabaseBackend::Postgres, "SELECT 1".to_owned());
    pool.connection()
        .query_one_raw(stmt)
        .await
        .map(|_| ())
        .map_err(AppError::from)
}

/// Readiness: database plus the recordings and documents buckets.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "All dependencies reachable", body = ReadyResponse),
        (status = 503, description = "A dependency is unreachable", body = ReadyResponse)
    )
)]
#[get("/ready")]
pub async fn ready(
    pool: web::Data<DbPool>,
    objects: web::Data<Arc<dyn ObjectStore>>,
) -> HttpResponse {
    let checks = vec![
        DependencyCheck::from_result("database", ping_database(&pool).await),
        DependencyCheck::from_result(
            "recordings_bucket",
            objects.check_bucket(StorageBucket::Recordings).await,
        ),
        DependencyCheck::from_result(
            "documents_bucket",
            objects.check_bucket(StorageBucket::Documents).await,
        ),
    ];

    let (status, body) = ReadyResponse::from_checks(checks);
    HttpResponse::build(status).json(body)
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready);
}
