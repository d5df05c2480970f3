//! Dashboard aggregate queries.

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{DashboardStats, LeadTypeCounts};

use super::DbPool;

impl DbPool {
    /// Aggregate a user's recordings, analyses and leads.
    pub async fn dashboard_stats(&self, user_id: Uuid) -> AppResult<DashboardStats> {
        let total_recordings = self.count_recordings(user_id).await?;
        let analyses = self.analysis_summaries(user_id).await?;
        let lead_types = self.lead_types(user_id).await?;

        let leads = LeadTypeCounts::tally(lead_types.iter().map(|t| t.as_deref()));

        Ok(DashboardStats::compute(total_recordings, &analyses, leads))
    }
}
