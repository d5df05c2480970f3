//! Recording entity: one uploaded call or pasted transcript.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recordings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub lead_id: Option<Uuid>,
    /// Display name, unique at submission time
    pub file_name: String,
    pub file_size: Option<i64>,
    pub stored_file_url: Option<String>,
    /// Object key inside the recordings bucket
    pub storage_path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub transcript: Option<String>,
    pub status: String,
    pub duration_seconds: Option<i32>,
    pub call_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lead::Entity",
        from = "Column::LeadId",
        to = "super::lead::Column::Id",
        on_delete = "SetNull"
    )]
    Lead,
    #[sea_orm(has_one = "super::analysis::Entity")]
    Analysis,
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lead.def()
    }
}

impl Related<super::analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analysis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
