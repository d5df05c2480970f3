//! Lead group API handlers.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{DashboardEvent, DeletedResponse, LeadGroup, LeadGroupRequest, LeadGroupWithCount};
use crate::services::EventBroadcaster;

/// List groups with the number of leads in each.
#[utoipa::path(
    get,
    path = "/api/v1/lead-groups",
    tag = "Lead Groups",
    responses(
        (status = 200, description = "Groups with lead counts", body = Vec<LeadGroupWithCount>),
    )
)]
pub async fn list_lead_groups(
    auth: Authenticated,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let groups: Vec<LeadGroupWithCount> = pool
        .list_lead_groups_with_counts(auth.user.id)
        .await?
        .into_iter()
        .map(|(group, lead_count)| LeadGroupWithCount {
            group: LeadGroup::from(group),
            lead_count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(groups))
}

#[utoipa::path(
    post,
    path = "/api/v1/lead-groups",
    tag = "Lead Groups",
    request_body = LeadGroupRequest,
    responses(
        (status = 201, description = "Group created", body = LeadGroup),
        (status = 400, description = "Missing group name", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_lead_group(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<LeadGroupRequest>,
) -> AppResult<HttpResponse> {
    let name = body.validated_name()?;
    let group = pool.insert_lead_group(auth.user.id, name).await?;

    info!(group_id = %group.id, "Lead group created");
    broadcaster.send(DashboardEvent::group_changed(group.id));

    Ok(HttpResponse::Created().json(LeadGroup::from(group)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lead-groups/{group_id}",
    tag = "Lead Groups",
    request_body = LeadGroupRequest,
    params(
        ("group_id" = Uuid, Path, description = "Group UUID")
    ),
    responses(
        (status = 200, description = "Group renamed", body = LeadGroup),
        (status = 400, description = "Missing group name", body = crate::error::ErrorResponse),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn rename_lead_group(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<LeadGroupRequest>,
) -> AppResult<HttpResponse> {
    let group_id = path.into_inner();
    let name = body.validated_name()?;

    let group = pool.rename_lead_group(auth.user.id, group_id, name).await?;
    broadcaster.send(DashboardEvent::group_changed(group.id));

    Ok(HttpResponse::Ok().json(LeadGroup::from(group)))
}

/// Delete a group. Its leads stay, without a group.
#[utoipa::path(
    delete,
    path = "/api/v1/lead-groups/{group_id}",
    tag = "Lead Groups",
    params(
        ("group_id" = Uuid, Path, description = "Group UUID")
    ),
    responses(
        (status = 200, description = "Group deleted", body = DeletedResponse),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_lead_group(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let group_id = path.into_inner();

    if !pool.delete_lead_group(auth.user.id, group_id).await? {
        return Err(AppError::NotFound("Lead group".to_string()));
    }

    info!(group_id = %group_id, "Lead group deleted");
    broadcaster.send(DashboardEvent::group_changed(group_id));

    Ok(HttpResponse::Ok().json(DeletedResponse {
        id: group_id,
        deleted: true,
    }))
}

/// Configure lead group routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/lead-groups")
            .route(web::get().to(list_lead_groups))
            .route(web::post().to(create_lead_group)),
    )
    .service(
        web::resource("/lead-groups/{group_id}")
            .route(web::put().to(rename_lead_group))
            .route(web::delete().to(delete_lead_group)),
    );
}
