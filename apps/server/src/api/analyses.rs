//! Analysis API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::Analysis;

/// Get the full analysis of a call.
#[utoipa::path(
    get,
    path = "/api/v1/analyses/{analysis_id}",
    tag = "Analyses",
    params(
        ("analysis_id" = Uuid, Path, description = "Analysis UUID")
    ),
    responses(
        (status = 200, description = "Analysis found", body = Analysis),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_analysis(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let analysis_id = path.into_inner();

    let analysis = pool
        .get_analysis(auth.user.id, analysis_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {}", analysis_id)))?;

    Ok(HttpResponse::Ok().json(Analysis::from(analysis)))
}

/// Configure analysis routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/analyses/{analysis_id}").route(web::get().to(get_analysis)));
}
