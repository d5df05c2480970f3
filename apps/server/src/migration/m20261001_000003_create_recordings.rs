//! Migration: Create recordings table.
//!
//! `file_name` is indexed but deliberately not unique; uniqueness is checked
//! by the ingestion workflow before insert.

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
                CREATE TABLE recordings (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL,
                    lead_id UUID REFERENCES leads(id) ON DELETE SET NULL,
                    file_name VARCHAR(500) NOT NULL,
                    file_size BIGINT,
                    stored_file_url TEXT,
                    storage_path TEXT,
                    transcript TEXT,
                    status VARCHAR(20) NOT NULL DEFAULT 'uploaded',
                    duration_seconds INTEGER,
                    call_date TIMESTAMPTZ,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Audio and transcript input modes are mutually exclusive
                    CHECK (stored_file_url IS NULL OR transcript IS NULL)
                );

                CREATE INDEX idx_recordings_file_name ON recordings(file_name);
                CREATE INDEX idx_recordings_user_created
                    ON recordings(user_id, created_at DESC);
                CREATE INDEX idx_recordings_lead_id ON recordings(lead_id)
                    WHERE lead_id IS NOT NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS recordings CASCADE;")
            .await?;

        Ok(())
    }
}
