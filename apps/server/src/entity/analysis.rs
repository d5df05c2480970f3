//! Analysis entity. Result columns are written by the external pipeline.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub recording_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub sentiment_score: Option<f64>,
    pub engagement_score: Option<f64>,
    pub confidence_score_executive: Option<f64>,
    pub confidence_score_person: Option<f64>,
    pub participants: Option<Json>,
    pub lead_type: Option<String>,
    pub objections_handled: Option<String>,
    pub objections_detected_count: Option<i32>,
    pub objections_handled_count: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub next_steps: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub improvements: Option<String>,
    pub call_outcome: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub short_summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub detailed_call_analysis: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub lead_type_explanation: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub sentiment_explanation: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub engagement_explanation: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub confidence_explanation_executive: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub confidence_explanation_person: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub objections_detected: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub objections_handling_details: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub next_steps_detailed: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub improvements_for_team: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub call_outcome_rationale: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub evidence_quotes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recording::Entity",
        from = "Column::RecordingId",
        to = "super::recording::Column::Id",
        on_delete = "Cascade"
    )]
    Recording,
}

impl Related<super::recording::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recording.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
