//! Document attached to the company knowledge base.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "brain_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_brain_id: Option<Uuid>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub storage_path: String,
    pub storage_url: Option<String>,
    pub mime_type: Option<String>,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub tags: Option<Json>,
    pub category: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub extracted_text: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company_brain::Entity",
        from = "Column::CompanyBrainId",
        to = "super::company_brain::Column::Id",
        on_delete = "SetNull"
    )]
    CompanyBrain,
}

impl Related<super::company_brain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyBrain.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
