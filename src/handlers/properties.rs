use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{lookup_err, ApiError};
use crate::middleware::upload::read_upload;
use crate::models::image::{Image, ImageResponse};
use crate::models::property::{Property, PropertyResponse, PropertyStatus};
use crate::services::occupancy;
use crate::state::AppState;
use crate::store::{Query, SortDirection};
use crate::validation::validate_property;

use super::{decode_row, str_field};

const TABLE: &str = "properties";

/// GET /api/properties
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PropertyResponse>>, ApiError> {
    let rows = state
        .store
        .select(TABLE, &Query::new().order("created_at", SortDirection::Desc))
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve properties"))?;

    let mut properties = Vec::with_capacity(rows.len());
    for row in rows {
        let property: Property = decode_row(row)?;
        properties.push(PropertyResponse::from(property));
    }
    Ok(Json(properties))
}

/// GET /api/properties/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PropertyResponse>, ApiError> {
    let row = state
        .store
        .select_one(TABLE, &Query::new().eq("property_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Property not found", "Failed to retrieve property"))?;
    let property: Property = decode_row(row)?;
    Ok(Json(property.into()))
}

/// POST /api/properties
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<PropertyResponse>), ApiError> {
    validate_property(&payload)?;
    let status: PropertyStatus = serde_json::from_value(payload["status"].clone())
        .map_err(|_| ApiError::bad_request("Status must be available, occupied, or under_maintenance"))?;

    let now = Utc::now().to_rfc3339();
    let property = Property {
        property_id: Uuid::new_v4().to_string(),
        name: str_field(&payload, "name"),
        address: str_field(&payload, "address"),
        property_type: str_field(&payload, "property_type"),
        status,
        monthly_rent: payload.get("monthly_rent").and_then(Value::as_f64),
        created_at: now.clone(),
        updated_at: now,
    };

    let row = serde_json::to_value(&property)
        .map_err(|e| ApiError::upstream(e, "Failed to create property"))?;
    let stored = state
        .store
        .insert(TABLE, row)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to create property"))?;
    let created: Property = decode_row(stored)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /api/properties/:id - full-field overwrite
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<PropertyResponse>, ApiError> {
    validate_property(&payload)?;
    let status: PropertyStatus = serde_json::from_value(payload["status"].clone())
        .map_err(|_| ApiError::bad_request("Status must be available, occupied, or under_maintenance"))?;

    state
        .store
        .select_one(TABLE, &Query::new().eq("property_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Property not found", "Failed to update property"))?;

    let changes = json!({
        "name": str_field(&payload, "name"),
        "address": str_field(&payload, "address"),
        "property_type": str_field(&payload, "property_type"),
        "status": status,
        "monthly_rent": payload.get("monthly_rent").and_then(Value::as_f64),
        "updated_at": Utc::now().to_rfc3339(),
    });
    let rows = state
        .store
        .update(TABLE, &Query::new().eq("property_id", &id), changes)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to update property"))?;

    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal("Failed to update property"))?;
    let updated: Property = decode_row(row)?;
    Ok(Json(updated.into()))
}

/// DELETE /api/properties/:id - refused while an active contract exists
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let _guard = state.locks.lock(&id).await;

    let active = occupancy::has_active_contract(state.store.as_ref(), &id, None)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete property"))?;
    if active {
        return Err(ApiError::bad_request("Cannot delete property with active contracts"));
    }

    state
        .store
        .delete(TABLE, &Query::new().eq("property_id", &id))
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete property"))?;
    Ok(Json(json!({ "message": "Property deleted successfully" })))
}

/// POST /api/properties/:id/images
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .store
        .select_one(TABLE, &Query::new().eq("property_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Property not found", "Failed to upload image"))?;

    let form = read_upload(multipart, "image").await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("No image file provided"))?;
    if !file.content_type.starts_with("image/") {
        return Err(ApiError::bad_request("Only image files are allowed!"));
    }

    let file_name = format!("{}.{}", Uuid::new_v4(), file.extension());
    let file_path = format!("property-images/{}/{}", id, file_name);
    let size = file.bytes.len();

    state
        .files
        .upload(&file_path, file.bytes, &file.content_type)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to upload image"))?;
    let public_url = state.files.public_url(&file_path);

    let image = Image {
        image_id: Uuid::new_v4().to_string(),
        property_id: id,
        file_name,
        file_path,
        public_url,
        content_type: file.content_type,
        size,
        created_at: Utc::now().to_rfc3339(),
    };
    let row = serde_json::to_value(&image)
        .map_err(|e| ApiError::upstream(e, "Failed to upload image"))?;
    state
        .store
        .insert("images", row)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to upload image"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": image.image_id,
            "property_id": image.property_id,
            "file_name": image.file_name,
            "public_url": image.public_url,
        })),
    ))
}

/// GET /api/properties/:id/images
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    state
        .store
        .select_one(TABLE, &Query::new().eq("property_id", &id))
        .await
        .map_err(|e| lookup_err(e, "Property not found", "Failed to retrieve property images"))?;

    let rows = state
        .store
        .select(
            "images",
            &Query::new()
                .eq("property_id", &id)
                .order("created_at", SortDirection::Desc),
        )
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to retrieve property images"))?;

    let mut images = Vec::with_capacity(rows.len());
    for row in rows {
        let image: Image = decode_row(row)?;
        images.push(ImageResponse::from(image));
    }
    Ok(Json(images))
}

/// GET /api/properties/:id/images/:image_id - redirect to the stored file
pub async fn image_redirect(
    State(state): State<AppState>,
    Path((property_id, image_id)): Path<(String, String)>,
) -> Result<Redirect, ApiError> {
    let row = state
        .store
        .select_one(
            "images",
            &Query::new()
                .eq("property_id", &property_id)
                .eq("image_id", &image_id),
        )
        .await
        .map_err(|e| lookup_err(e, "Image not found", "Failed to retrieve image"))?;
    let image: Image = decode_row(row)?;
    Ok(Redirect::to(&image.public_url))
}
