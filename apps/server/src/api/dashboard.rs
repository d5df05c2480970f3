//! Dashboard statistics handler.

use actix_web::{HttpResponse, web};

use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::DashboardStats;

/// Aggregate call and lead statistics for the dashboard header.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardStats),
    )
)]
pub async fn dashboard_stats(
    auth: Authenticated,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let stats = pool.dashboard_stats(auth.user.id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboard/stats").route(web::get().to(dashboard_stats)));
}
