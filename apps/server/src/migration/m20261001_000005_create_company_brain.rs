//! Migration: Create company_brain table.

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
                CREATE TABLE company_brain (
                    id UUID PRIMARY KEY,
                    user_id UUID NOT NULL UNIQUE,
                    company_name VARCHAR(255),
                    company_tagline VARCHAR(500),
                    company_description TEXT,
                    industry VARCHAR(255),
                    founded_year INTEGER,
                    company_size VARCHAR(100),
                    headquarters_location VARCHAR(255),
                    website_url VARCHAR(500),
                    contact_email VARCHAR(255),
                    contact_phone VARCHAR(100),
                    mission_statement TEXT,
                    vision_statement TEXT,
                    core_values JSONB,
                    unique_selling_points JSONB,
                    target_audience TEXT,
                    products_services JSONB,
                    pricing_model VARCHAR(255),
                    key_features JSONB,
                    founder_info TEXT,
                    leadership_team JSONB,
                    team_size_details VARCHAR(500),
                    additional_context TEXT,
                    custom_fields JSONB,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE TRIGGER update_company_brain_updated_at
                    BEFORE UPDATE ON company_brain
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
                DROP TRIGGER IF EXISTS update_company_brain_updated_at ON company_brain;
                DROP TABLE IF EXISTS company_brain CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
