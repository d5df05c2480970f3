//! Migration: Create leads table.

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
                CREATE TABLE leads (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL,
                    name VARCHAR(255) NOT NULL,
                    email VARCHAR(255) NOT NULL,
                    contact VARCHAR(100) NOT NULL,
                    description TEXT,
                    other JSONB,
                    group_id UUID REFERENCES lead_groups(id) ON DELETE SET NULL,
                    lead_type VARCHAR(20)
                        CHECK (lead_type IN ('hot', 'warm', 'cold', 'closing')),
                    project VARCHAR(255),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_leads_user_id ON leads(user_id);
                CREATE INDEX idx_leads_group_id ON leads(group_id);

                CREATE TRIGGER update_leads_updated_at
                    BEFORE UPDATE ON leads
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
                DROP TRIGGER IF EXISTS update_leads_updated_at ON leads;
                DROP TABLE IF EXISTS leads CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
