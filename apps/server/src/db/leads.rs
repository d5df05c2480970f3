//! Database queries for leads.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::lead::{self, ActiveModel, Entity as Lead};
use crate::entity::{analysis, recording};
use crate::error::{AppError, AppResult};
use crate::models::{LeadType, ListLeadsQuery, ValidLead};

use super::DbPool;

/// Call activity for one lead, taken from its newest recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadActivity {
    pub call_count: u64,
    pub last_call_quality: Option<f64>,
    pub lead_status: Option<String>,
}

impl DbPool {
    /// List a user's leads, newest first.
    pub async fn list_leads(
        &self,
        user_id: Uuid,
        query: &ListLeadsQuery,
    ) -> AppResult<Vec<lead::Model>> {
        let mut select = Lead::find().filter(lead::Column::UserId.eq(user_id));

        if let Some(group_id) = query.group_id {
            select = select.filter(lead::Column::GroupId.eq(group_id));
        }

        if let Some(raw) = query.lead_type.as_deref().filter(|s| !s.trim().is_empty()) {
            let lead_type = LeadType::parse(raw)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown lead_type '{}'", raw)))?;
            select = select.filter(lead::Column::LeadType.eq(lead_type.as_str()));
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            select = select.filter(Expr::cust_with_values(
                "(name ILIKE $1 OR email ILIKE $2 OR contact ILIKE $3 OR project ILIKE $4)",
                [
                    pattern.clone(),
                    pattern.clone(),
                    pattern.clone(),
                    pattern,
                ],
            ));
        }

        let leads = select
            .order_by_desc(lead::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list leads: {}", e)))?;

        Ok(leads)
    }

    /// Get a lead owned by `user_id`.
    pub async fn get_lead(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<lead::Model>> {
        let result = Lead::find_by_id(id)
            .filter(lead::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get lead: {}", e)))?;

        Ok(result)
    }

    /// Insert a new lead.
    pub async fn insert_lead(&self, user_id: Uuid, lead: ValidLead) -> AppResult<lead::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            name: Set(lead.name),
            email: Set(lead.email),
            contact: Set(lead.contact),
            description: Set(lead.description),
            other: Set(lead.other),
            group_id: Set(lead.group_id),
            lead_type: Set(lead.lead_type.map(|t| t.as_str().to_string())),
            project: Set(lead.project),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert lead: {}", e)))?;

        Ok(result)
    }

    /// Replace a lead's editable fields.
    pub async fn update_lead(
        &self,
        user_id: Uuid,
        id: Uuid,
        lead: ValidLead,
    ) -> AppResult<lead::Model> {
        let existing = self
            .get_lead(user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead".to_string()))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(lead.name);
        active.email = Set(lead.email);
        active.contact = Set(lead.contact);
        active.description = Set(lead.description);
        active.other = Set(lead.other);
        active.group_id = Set(lead.group_id);
        active.lead_type = Set(lead.lead_type.map(|t| t.as_str().to_string()));
        active.project = Set(lead.project);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update lead: {}", e)))?;

        Ok(result)
    }

    /// Delete a lead. Its recordings are detached by the foreign key.
    pub async fn delete_lead(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = Lead::delete_many()
            .filter(lead::Column::Id.eq(id))
            .filter(lead::Column::UserId.eq(user_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete lead: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    /// Raw lead_type of every lead a user owns.
    pub async fn lead_types(&self, user_id: Uuid) -> AppResult<Vec<Option<String>>> {
        let rows = Lead::find()
            .select_only()
            .column(lead::Column::LeadType)
            .filter(lead::Column::UserId.eq(user_id))
            .into_tuple::<Option<String>>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list lead types: {}", e)))?;

        Ok(rows)
    }

    /// Call count and newest-call analysis for each lead with recordings.
    pub async fn lead_activity(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, LeadActivity>> {
        let rows = recording::Entity::find()
            .filter(recording::Column::UserId.eq(user_id))
            .filter(recording::Column::LeadId.is_not_null())
            .find_also_related(analysis::Entity)
            .order_by_desc(recording::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load lead activity: {}", e)))?;

        Ok(summarize_activity(rows))
    }
}

/// Fold recordings (newest first) into per-lead activity.
fn summarize_activity(
    rows: Vec<(recording::Model, Option<analysis::Model>)>,
) -> HashMap<Uuid, LeadActivity> {
    let mut activity: HashMap<Uuid, LeadActivity> = HashMap::new();

    for (recording, analysis) in rows {
        let Some(lead_id) = recording.lead_id else {
            continue;
        };

        let entry = activity.entry(lead_id).or_default();
        if entry.call_count == 0 {
            if let Some(analysis) = analysis {
                entry.last_call_quality = analysis.sentiment_score;
                entry.lead_status = analysis.lead_type;
            }
        }
        entry.call_count += 1;
    }

    activity
}
