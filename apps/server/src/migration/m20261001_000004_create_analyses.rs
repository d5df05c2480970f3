//! Migration: Create analyses table.
//!
//! Result columns stay NULL until the external pipeline writes them.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE analyses (
                    id UUID PRIMARY KEY,
                    recording_id UUID NOT NULL UNIQUE
                        REFERENCES recordings(id) ON DELETE CASCADE,
                    user_id UUID NOT NULL,
                    status VARCHAR(20) NOT NULL DEFAULT 'pending',

                    sentiment_score DOUBLE PRECISION,
                    engagement_score DOUBLE PRECISION,
                    confidence_score_executive DOUBLE PRECISION,
                    confidence_score_person DOUBLE PRECISION,
                    participants JSONB,
                    lead_type VARCHAR(50),
                    objections_handled TEXT,
                    objections_detected_count INTEGER,
                    objections_handled_count INTEGER,
                    next_steps TEXT,
                    improvements TEXT,
                    call_outcome VARCHAR(255),
                    short_summary TEXT,
                    detailed_call_analysis TEXT,

                    lead_type_explanation TEXT,
                    sentiment_explanation TEXT,
                    engagement_explanation TEXT,
                    confidence_explanation_executive TEXT,
                    confidence_explanation_person TEXT,
                    objections_detected TEXT,
                    objections_handling_details TEXT,
                    next_steps_detailed TEXT,
                    improvements_for_team TEXT,
                    call_outcome_rationale TEXT,
                    evidence_quotes TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_analyses_user_status ON analyses(user_id, status);

                CREATE TRIGGER update_analyses_updated_at
                    BEFORE UPDATE ON analyses
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_analyses_updated_at ON analyses;
                DROP TABLE IF EXISTS analyses CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
