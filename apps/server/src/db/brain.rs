//! Database queries for the company brain and its documents.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::brain_document::{self, Entity as BrainDocument};
use crate::entity::company_brain::{self, Entity as CompanyBrain};
use crate::error::{AppError, AppResult};
use crate::models::brain::DOCUMENT_STATUS_UPLOADED;
use crate::models::{CompanyBrainFields, NewBrainDocument};

use super::DbPool;

/// Copy every profile field onto an active model.
fn apply_fields(active: &mut company_brain::ActiveModel, fields: CompanyBrainFields) {
    active.core_values = Set(CompanyBrainFields::list_to_json(&fields.core_values));
    active.unique_selling_points =
        Set(CompanyBrainFields::list_to_json(&fields.unique_selling_points));
    active.key_features = Set(CompanyBrainFields::list_to_json(&fields.key_features));
    active.company_name = Set(fields.company_name);
    active.company_tagline = Set(fields.company_tagline);
    active.company_description = Set(fields.company_description);
    active.industry = Set(fields.industry);
    active.founded_year = Set(fields.founded_year);
    active.company_size = Set(fields.company_size);
    active.headquarters_location = Set(fields.headquarters_location);
    active.website_url = Set(fields.website_url);
    active.contact_email = Set(fields.contact_email);
    active.contact_phone = Set(fields.contact_phone);
    active.mission_statement = Set(fields.mission_statement);
    active.vision_statement = Set(fields.vision_statement);
    active.target_audience = Set(fields.target_audience);
    active.products_services = Set(fields.products_services);
    active.pricing_model = Set(fields.pricing_model);
    active.founder_info = Set(fields.founder_info);
    active.leadership_team = Set(fields.leadership_team);
    active.team_size_details = Set(fields.team_size_details);
    active.additional_context = Set(fields.additional_context);
    active.custom_fields = Set(fields.custom_fields);
}

impl DbPool {
    /// Get the user's company profile, if one was saved.
    pub async fn get_company_brain(&self, user_id: Uuid) -> AppResult<Option<company_brain::Model>> {
        let result = CompanyBrain::find()
            .filter(company_brain::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get company brain: {}", e)))?;

        Ok(result)
    }

    /// Update the user's profile if it exists, otherwise insert it.
    pub async fn upsert_company_brain(
        &self,
        user_id: Uuid,
        fields: CompanyBrainFields,
    ) -> AppResult<company_brain::Model> {
        let now = Utc::now();

        let result = match self.get_company_brain(user_id).await? {
            Some(existing) => {
                let mut active: company_brain::ActiveModel = existing.into();
                apply_fields(&mut active, fields);
                active.updated_at = Set(now);
                active.update(self.connection()).await.map_err(|e| {
                    AppError::Database(format!("Failed to update company brain: {}", e))
                })?
            }
            None => {
                let mut active = company_brain::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    user_id: Set(user_id),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                apply_fields(&mut active, fields);
                active.insert(self.connection()).await.map_err(|e| {
                    AppError::Database(format!("Failed to insert company brain: {}", e))
                })?
            }
        };

        Ok(result)
    }

    /// List the user's documents, newest first.
    pub async fn list_brain_documents(
        &self,
        user_id: Uuid,
    ) -> AppResult<Vec<brain_document::Model>> {
        let documents = BrainDocument::find()
            .filter(brain_document::Column::UserId.eq(user_id))
            .order_by_desc(brain_document::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list brain documents: {}", e)))?;

        Ok(documents)
    }

    /// Get a document owned by `user_id`.
    pub async fn get_brain_document(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> AppResult<Option<brain_document::Model>> {
        let result = BrainDocument::find_by_id(id)
            .filter(brain_document::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get brain document: {}", e)))?;

        Ok(result)
    }

    /// Insert a document row with status `uploaded`.
    pub async fn insert_brain_document(
        &self,
        new: NewBrainDocument,
    ) -> AppResult<brain_document::Model> {
        let now = Utc::now();

        let model = brain_document::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(new.user_id),
            company_brain_id: Set(new.company_brain_id),
            file_name: Set(new.file_name),
            file_type: Set(new.file_type.as_str().to_string()),
            file_size: Set(Some(new.file_size)),
            storage_path: Set(new.storage_path),
            storage_url: Set(Some(new.storage_url)),
            mime_type: Set(Some(new.mime_type)),
            status: Set(DOCUMENT_STATUS_UPLOADED.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert brain document: {}", e)))?;

        Ok(result)
    }

    /// Delete a document row.
    pub async fn delete_brain_document(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = BrainDocument::delete_many()
            .filter(brain_document::Column::Id.eq(id))
            .filter(brain_document::Column::UserId.eq(user_id))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete brain document: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
