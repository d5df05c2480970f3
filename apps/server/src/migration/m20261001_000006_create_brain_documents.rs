//! Migration: Create brain_documents table.

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
                CREATE TABLE brain_documents (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL,
                    company_brain_id UUID REFERENCES company_brain(id) ON DELETE SET NULL,
                    file_name VARCHAR(500) NOT NULL,
                    file_type VARCHAR(20) NOT NULL
                        CHECK (file_type IN ('image', 'video', 'audio', 'pdf', 'document', 'other')),
                    file_size BIGINT,
                    storage_path TEXT NOT NULL,
                    storage_url TEXT,
                    mime_type VARCHAR(255),
                    title VARCHAR(500),
                    description TEXT,
                    tags JSONB,
                    category VARCHAR(100),
                    status VARCHAR(20) NOT NULL DEFAULT 'uploaded',
                    extracted_text TEXT,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_brain_documents_user_created
                    ON brain_documents(user_id, created_at DESC);

                CREATE TRIGGER update_brain_documents_updated_at
                    BEFORE UPDATE ON brain_documents
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
                DROP TRIGGER IF EXISTS update_brain_documents_updated_at ON brain_documents;
                DROP TABLE IF EXISTS brain_documents CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
