//! Dashboard aggregate models.

use serde::Serialize;
use utoipa::ToSchema;

use super::analysis::StatusPhase;
use super::lead::LeadTypeCounts;

/// Totals shown on the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_recordings: u64,
    pub completed_analyses: u64,
    /// Analyses not yet in a terminal phase, plus recordings that have none
    pub in_flight: u64,
    pub failed_analyses: u64,
    pub average_sentiment: Option<f64>,
    pub average_engagement: Option<f64>,
    pub leads: LeadTypeCounts,
}

impl DashboardStats {
    /// Build the totals from `(status, sentiment, engagement)` rows.
    ///
    /// Averages only cover completed analyses that carry a score.
    pub fn compute(
        total_recordings: u64,
        analyses: &[(String, Option<f64>, Option<f64>)],
        leads: LeadTypeCounts,
    ) -> Self {
        let mut completed = 0u64;
        let mut failed = 0u64;
        let mut pending = 0u64;
        let mut sentiments = Vec::new();
        let mut engagements = Vec::new();

        for (status, sentiment, engagement) in analyses {
            let phase = StatusPhase::from_raw(status);
            if !phase.is_terminal() {
                pending += 1;
                continue;
            }
            match phase {
                StatusPhase::Completed => {
                    completed += 1;
                    sentiments.extend(*sentiment);
                    engagements.extend(*engagement);
                }
                StatusPhase::Failed => failed += 1,
                _ => {}
            }
        }

        let without_analysis = total_recordings.saturating_sub(analyses.len() as u64);

        Self {
            total_recordings,
            completed_analyses: completed,
            in_flight: pending + without_analysis,
            failed_analyses: failed,
            average_sentiment: mean(&sentiments),
            average_engagement: mean(&engagements),
            leads,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
