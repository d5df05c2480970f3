//! Company knowledge base, one row per user.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company_brain")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub company_name: Option<String>,
    pub company_tagline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub company_description: Option<String>,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub company_size: Option<String>,
    pub headquarters_location: Option<String>,
    pub website_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub mission_statement: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub vision_statement: Option<String>,
    pub core_values: Option<Json>,
    pub unique_selling_points: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub target_audience: Option<String>,
    pub products_services: Option<Json>,
    pub pricing_model: Option<String>,
    pub key_features: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub founder_info: Option<String>,
    pub leadership_team: Option<Json>,
    pub team_size_details: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_context: Option<String>,
    pub custom_fields: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::brain_document::Entity")]
    Documents,
}

impl Related<super::brain_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
