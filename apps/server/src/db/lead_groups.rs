//! Database queries for lead groups.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::lead;
use crate::entity::lead_group::{self, ActiveModel, Entity as LeadGroup};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// List a user's groups with the number of leads in each, newest first.
    pub async fn list_lead_groups_with_counts(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<(lead_group::Model, u64)>> {
        let groups = LeadGroup::find()
            .filter(lead_group::Column::UserId.eq(user_id))
            .order_by_desc(lead_group::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list lead groups: {}", e)))?;

        let memberships = lead::Entity::find()
            .select_only()
            .column(lead::Column::GroupId)
            .filter(lead::Column::UserId.eq(user_id))
            .filter(lead::Column::GroupId.is_not_null())
            .into_tuple::<Option<Uuid>>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count group leads: {}", e)))?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for group_id in memberships.into_iter().flatten() {
            *counts.entry(group_id).or_insert(0) += 1;
        }

        Ok(groups
            .into_iter()
            .map(|g| {
                let count = counts.get(&g.id).copied().unwrap_or(0);
                (g, count)
            })
            .collect())
    }

    /// Get a group owned by `user_id`.
    pub async fn get_lead_group(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<lead_group::Model>> {
        let result = LeadGroup::find_by_id(id)
            .filter(lead_group::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get lead group: {}", e)))?;

        Ok(result)
    }

    /// Insert a new group.
    pub async fn insert_lead_group(
        &self,
        user_id: Uuid,
        group_name: String,
    ) -> AppResult<lead_group::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            group_name: Set(group_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert lead group: {}", e)))?;

        Ok(result)
    }

    /// Rename a group.
    pub async fn rename_lead_group(
        &self,
        user_id: Uuid,
        id: Uuid,
        group_name: String,
    ) -> AppResult<lead_group::Model> {
        let existing = self
            .get_lead_group(user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead group".to_string()))?;

        let mut active: ActiveModel = existing.into();
        active.group_name = Set(group_name);
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update lead group: {}", e)))?;

        Ok(result)
    }

    /// Delete a group. Member leads are detached by the foreign key.
    pub async fn delete_lead_group(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = LeadGroup::delete_many()
            .filter(lead_group::Column::Id.eq(id))
            .filter(lead_group::Column::UserId.eq(user_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete lead group: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
