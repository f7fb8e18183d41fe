use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{lookup_err, ApiError};
use crate::middleware::upload::read_upload;
use crate::models::document::{Document, DocumentResponse, EntityType};
use crate::state::AppState;
use crate::store::{Query, SortDirection};

use super::decode_row;

const TABLE: &str = "documents";

/// POST /api/documents/:entity_type/:entity_id
pub async fn upload(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let entity: EntityType = entity_type
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid entity type"))?;

    state
        .store
        .select_one(entity.table(), &Query::new().eq(entity.id_column(), &entity_id))
        .await
        .map_err(|e| {
            lookup_err(e, &format!("{} not found", entity), "Failed to upload document")
        })?;

    let form = read_upload(multipart, "document").await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("No document file provided"))?;

    let document_type = form
        .fields
        .get("document_type")
        .cloned()
        .unwrap_or_else(|| "other".to_string());
    let document_name = form
        .fields
        .get("document_name")
        .cloned()
        .unwrap_or_else(|| file.file_name.clone());
    let description = form.fields.get("description").cloned().unwrap_or_default();

    let file_name = format!("{}.{}", Uuid::new_v4(), file.extension());
    let file_path = format!("documents/{}/{}/{}", entity, entity_id, file_name);
    let size = file.bytes.len();

    state
        .files
        .upload(&file_path, file.bytes, &file.content_type)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to upload document"))?;
    let public_url = state.files.public_url(&file_path);

    let now = Utc::now().to_rfc3339();
    let document = Document {
        document_id: Uuid::new_v4().to_string(),
        entity_type: entity,
        entity_id,
        document_type,
        document_name,
        description,
        file_name,
        file_path,
        public_url,
        content_type: file.content_type,
        size,
        created_at: now.clone(),
        updated_at: now,
    };
    let row = serde_json::to_value(&document)
        .map_err(|e| ApiError::upstream(e, "Failed to upload document"))?;
    state
        .store
        .insert(TABLE, row)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to upload document"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": document.document_id,
            "entity_type": document.entity_type,
            "entity_id": document.entity_id,
            "document_type": document.document_type,
            "document_name": document.document_name,
            "description": document.description,
            "public_url": document.public_url,
        })),
    ))
}

/// GET /api/documents/:entity_type/:entity_id
pub async fn list_by_entity(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let entity: EntityType = entity_type
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid entity type"))?;

    let rows = state
        .store
        .select(
            TABLE,
            &Query::new()
                .eq("entity_type", entity.as_str())
                .eq("entity_id", &entity_id)
                .order("created_at", SortDirection::Desc),
        )
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve documents"))?;

    let mut documents = Vec::with_capacity(rows.len());
    for row in rows {
        let document: Document = decode_row(row)?;
        documents.push(DocumentResponse::from(document));
    }
    Ok(Json(documents))
}

/// GET /api/documents/:document_id
pub async fn get(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let row = state
        .store
        .select_one(TABLE, &Query::new().eq("document_id", &document_id))
        .await
        .map_err(|e| lookup_err(e, "Document not found", "Failed to retrieve document"))?;
    let document: Document = decode_row(row)?;
    Ok(Json(document.into()))
}

/// DELETE /api/documents/:document_id
pub async fn remove(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let row = state
        .store
        .select_one(TABLE, &Query::new().eq("document_id", &document_id))
        .await
        .map_err(|e| lookup_err(e, "Document not found", "Failed to delete document"))?;
    let document: Document = decode_row(row)?;

    // Best effort: a storage failure must not strand the record.
    if let Err(err) = state.files.remove(&document.file_path).await {
        tracing::error!("Error deleting file from storage: {}", err);
    }

    state
        .store
        .delete(TABLE, &Query::new().eq("document_id", &document_id))
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete document"))?;
    Ok(Json(json!({ "message": "Document deleted successfully" })))
}
