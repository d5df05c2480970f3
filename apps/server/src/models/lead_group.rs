//! Lead group models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::lead_group;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<lead_group::Model> for LeadGroup {
    fn from(m: lead_group::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            group_name: m.group_name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadGroupWithCount {
    #[serde(flatten)]
    pub group: LeadGroup,
    pub lead_count: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeadGroupRequest {
    pub group_name: String,
}

impl LeadGroupRequest {
    /// Trimmed group name.
    pub fn validated_name(&self) -> AppResult<String> {
        let name = self.group_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("group_name is required".to_string()));
        }
        Ok(name.to_string())
    }
}
