//! Company brain handlers: the company profile and its document library.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::form;
use crate::auth::Authenticated;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{BrainDocument, CompanyBrain, CompanyBrainFields, DeletedResponse};
use crate::services::file_validator::FileRejection;
use crate::services::{DocumentLibrary, DocumentUpload};

/// Multipart form for uploading a document (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct DocumentUploadForm {
    /// Display name; defaults to the file name without extension
    name: Option<String>,
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/api/v1/brain",
    tag = "Brain",
    responses(
        (status = 200, description = "Company profile", body = CompanyBrain),
        (status = 404, description = "No profile saved yet", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_brain(auth: Authenticated, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let brain = pool
        .get_company_brain(auth.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company brain".to_string()))?;

    Ok(HttpResponse::Ok().json(CompanyBrain::from(brain)))
}

/// Save the company profile, creating it on first save.
#[utoipa::path(
    put,
    path = "/api/v1/brain",
    tag = "Brain",
    request_body = CompanyBrainFields,
    responses(
        (status = 200, description = "Profile saved", body = CompanyBrain),
    )
)]
pub async fn save_brain(
    auth: Authenticated,
    pool: web::Data<DbPool>,
    body: web::Json<CompanyBrainFields>,
) -> AppResult<HttpResponse> {
    let brain = pool
        .upsert_company_brain(auth.user.id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(CompanyBrain::from(brain)))
}

#[utoipa::path(
    get,
    path = "/api/v1/brain/documents",
    tag = "Brain",
    responses(
        (status = 200, description = "Documents, newest first", body = Vec<BrainDocument>),
    )
)]
pub async fn list_documents(
    auth: Authenticated,
    library: web::Data<DocumentLibrary>,
) -> AppResult<HttpResponse> {
    let documents = library.list(&auth.user).await?;
    Ok(HttpResponse::Ok().json(documents))
}

/// Upload a document to the knowledge base.
#[utoipa::path(
    post,
    path = "/api/v1/brain/documents",
    tag = "Brain",
    request_body(content = DocumentUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = BrainDocument),
        (status = 400, description = "No file provided", body = crate::error::ErrorResponse),
        (status = 413, description = "File too large", body = crate::error::ErrorResponse),
        (status = 502, description = "Storage upload failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn upload_document(
    auth: Authenticated,
    library: web::Data<DocumentLibrary>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let max_bytes = library.max_document_size();
    let mut name: Option<String> = None;
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let field_name = content_disposition.get_name().unwrap_or("").to_string();
        let file_name = content_disposition.get_filename().map(String::from);

        match field_name.as_str() {
            "file" => {
                let file_name = file_name
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| AppError::InvalidInput("Missing filename".to_string()))?;
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let data = form::read_bytes(&mut field, max_bytes, || {
                    AppError::PayloadTooLarge(FileRejection::TooLarge { max_bytes }.message())
                })
                .await?;
                upload = Some((file_name, content_type, data));
            }
            "name" => name = Some(form::read_text(&mut field, "name").await?),
            _ => form::skip(&mut field).await,
        }
    }

    let (file_name, content_type, data) =
        upload.ok_or_else(|| AppError::InvalidInput("Please select a file".to_string()))?;

    let document = library
        .upload(
            &auth.user,
            DocumentUpload {
                name,
                file_name,
                content_type,
                data,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(document))
}

/// Delete a document and its stored file.
#[utoipa::path(
    delete,
    path = "/api/v1/brain/documents/{document_id}",
    tag = "Brain",
    params(
        ("document_id" = Uuid, Path, description = "Document UUID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = DeletedResponse),
        (status = 404, description = "Document not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_document(
    auth: Authenticated,
    library: web::Data<DocumentLibrary>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let document_id = path.into_inner();
    library.delete(&auth.user, document_id).await?;

    Ok(HttpResponse::Ok().json(DeletedResponse {
        id: document_id,
        deleted: true,
    }))
}

/// Configure brain routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/brain")
            .route(web::get().to(get_brain))
            .route(web::put().to(save_brain)),
    )
    .service(
        web::resource("/brain/documents")
            .route(web::get().to(list_documents))
            .route(web::post().to(upload_document)),
    )
    .service(
        web::resource("/brain/documents/{document_id}").route(web::delete().to(delete_document)),
    );
}
