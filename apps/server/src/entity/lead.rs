use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub contact: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub other: Option<Json>,
    pub group_id: Option<Uuid>,
    /// hot, warm, cold or closing
    pub lead_type: Option<String>,
    pub project: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lead_group::Entity",
        from = "Column::GroupId",
        to = "super::lead_group::Column::Id",
        on_delete = "SetNull"
    )]
    LeadGroup,
    #[sea_orm(has_many = "super::recording::Entity")]
    Recordings,
}

impl Related<super::lead_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeadGroup.def()
    }
}

impl Related<super::recording::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recordings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
