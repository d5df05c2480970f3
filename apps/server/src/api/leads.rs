//! Lead API handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::db::leads::LeadActivity;
use crate::entity::lead;
use crate::error::{AppError, AppResult};
use crate::models::{
    Analysis, DashboardEvent, DeletedResponse, Lead, LeadDetailResponse, LeadRecording,
    LeadRequest, LeadStatsResponse, LeadTypeCounts, LeadWithStats, ListLeadsQuery, Recording,
    ValidLead,
};
use crate::services::EventBroadcaster;

fn with_activity(
    leads: Vec<lead::Model>,
    activity: &HashMap<Uuid, LeadActivity>,
) -> Vec<LeadWithStats> {
    leads
        .into_iter()
        .map(|lead| {
            let stats = activity.get(&lead.id).cloned().unwrap_or_default();
            LeadWithStats {
                lead: Lead::from(lead),
                call_count: stats.call_count,
                last_call_quality: stats.last_call_quality,
                lead_status: stats.lead_status,
            }
        })
        .collect()
}

/// Reject a group the caller does not own.
async fn ensure_group_owned(pool: &DbPool, user_id: Uuid, lead: &ValidLead) -> AppResult<()> {
    if let Some(group_id) = lead.group_id {
        if pool.get_lead_group(user_id, group_id).await?.is_none() {
            return Err(AppError::InvalidInput(format!(
                "Unknown group_id {}",
                group_id
            )));
        }
    }
    Ok(())
}

/// List leads with their call activity.
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    tag = "Leads",
    params(
        ("group_id" = Option<Uuid>, Query, description = "Only leads in this group"),
        ("lead_type" = Option<String>, Query, description = "hot, warm, cold or closing"),
        ("search" = Option<String>, Query, description = "Matches name, email, contact or project"),
    ),
    responses(
        (status = 200, description = "Leads, newest first", body = Vec<LeadWithStats>),
        (status = 400, description = "Unknown lead type", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_leads(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    query: web::Query<ListLeadsQuery>,
) -> AppResult<HttpResponse> {
    let leads = pool.list_leads(auth.user.id, &query).await?;
    let activity = pool.lead_activity(auth.user.id).await?;

    Ok(HttpResponse::Ok().json(with_activity(leads, &activity)))
}

/// All leads with call activity plus counts per lead type.
#[utoipa::path(
    get,
    path = "/api/v1/leads/stats",
    tag = "Leads",
    responses(
        (status = 200, description = "Lead statistics", body = LeadStatsResponse),
    )
)]
pub async fn lead_stats(auth: Authenticated, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let leads = pool
        .list_leads(auth.user.id, &ListLeadsQuery::default())
        .await?;
    let activity = pool.lead_activity(auth.user.id).await?;

    let counts = LeadTypeCounts::tally(leads.iter().map(|l| l.lead_type.as_deref()));

    Ok(HttpResponse::Ok().json(LeadStatsResponse {
        leads: with_activity(leads, &activity),
        counts,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/leads",
    tag = "Leads",
    request_body = LeadRequest,
    responses(
        (status = 201, description = "Lead created", body = Lead),
        (status = 400, description = "Invalid lead", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_lead(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<LeadRequest>,
) -> AppResult<HttpResponse> {
    let valid = body.into_inner().validate()?;
    ensure_group_owned(&pool, auth.user.id, &valid).await?;

    let lead = pool.insert_lead(auth.user.id, valid).await?;

    info!(lead_id = %lead.id, "Lead created");
    broadcaster.send(DashboardEvent::lead_changed(lead.id));

    Ok(HttpResponse::Created().json(Lead::from(lead)))
}

#[utoipa::path(
    get,
    path = "/api/v1/leads/{lead_id}",
    tag = "Leads",
    params(
        ("lead_id" = Uuid, Path, description = "Lead UUID")
    ),
    responses(
        (status = 200, description = "Lead found", body = Lead),
        (status = 404, description = "Lead not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_lead(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let lead = pool
        .get_lead(auth.user.id, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Lead".to_string()))?;

    Ok(HttpResponse::Ok().json(Lead::from(lead)))
}

/// Replace a lead's fields.
#[utoipa::path(
    put,
    path = "/api/v1/leads/{lead_id}",
    tag = "Leads",
    request_body = LeadRequest,
    params(
        ("lead_id" = Uuid, Path, description = "Lead UUID")
    ),
    responses(
        (status = 200, description = "Lead updated", body = Lead),
        (status = 400, description = "Invalid lead", body = crate::error::ErrorResponse),
        (status = 404, description = "Lead not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_lead(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    body: web::Json<LeadRequest>,
) -> AppResult<HttpResponse> {
    let lead_id = path.into_inner();
    let valid = body.into_inner().validate()?;
    ensure_group_owned(&pool, auth.user.id, &valid).await?;

    let lead = pool.update_lead(auth.user.id, lead_id, valid).await?;
    broadcaster.send(DashboardEvent::lead_changed(lead.id));

    Ok(HttpResponse::Ok().json(Lead::from(lead)))
}

/// Delete a lead. Its recordings stay, unlinked.
#[utoipa::path(
    delete,
    path = "/api/v1/leads/{lead_id}",
    tag = "Leads",
    params(
        ("lead_id" = Uuid, Path, description = "Lead UUID")
    ),
    responses(
        (status = 200, description = "Lead deleted", body = DeletedResponse),
        (status = 404, description = "Lead not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_lead(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let lead_id = path.into_inner();

    if !pool.delete_lead(auth.user.id, lead_id).await? {
        return Err(AppError::NotFound("Lead".to_string()));
    }

    info!(lead_id = %lead_id, "Lead deleted");
    broadcaster.send(DashboardEvent::lead_changed(lead_id));

    Ok(HttpResponse::Ok().json(DeletedResponse {
        id: lead_id,
        deleted: true,
    }))
}

/// A lead with every recorded call and its analysis.
#[utoipa::path(
    get,
    path = "/api/v1/leads/{lead_id}/recordings",
    tag = "Leads",
    params(
        ("lead_id" = Uuid, Path, description = "Lead UUID")
    ),
    responses(
        (status = 200, description = "Lead detail", body = LeadDetailResponse),
        (status = 404, description = "Lead not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn lead_recordings(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let lead_id = path.into_inner();

    let lead = pool
        .get_lead(auth.user.id, lead_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lead".to_string()))?;

    let recordings = pool
        .list_recordings_with_analyses(auth.user.id, Some(lead_id))
        .await?
        .into_iter()
        .map(|(recording, analysis)| LeadRecording {
            recording: Recording::from(recording),
            analysis: analysis.map(Analysis::from),
        })
        .collect();

    Ok(HttpResponse::Ok().json(LeadDetailResponse {
        lead: Lead::from(lead),
        recordings,
    }))
}

/// Configure lead routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // /leads/stats must be registered before /leads/{lead_id}
    cfg.service(web::resource("/leads/stats").route(web::get().to(lead_stats)))
        .service(
            web::resource("/leads")
                .route(web::get().to(list_leads))
                .route(web::post().to(create_lead)),
        )
        .service(
            web::resource("/leads/{lead_id}")
                .route(web::get().to(get_lead))
                .route(web::put().to(update_lead))
                .route(web::delete().to(delete_lead)),
        )
        .service(
            web::resource("/leads/{lead_id}/recordings").route(web::get().to(lead_recordings)),
        );
}
