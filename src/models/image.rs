use serde::{Deserialize, Serialize};

/// Row in the platform's `images` table; one property has many.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub image_id: String,
    pub property_id: String,
    pub file_name: String,
    pub file_path: String,
    pub public_url: String,
    pub content_type: String,
    pub size: usize,
    pub created_at: String,
}

/// Listing shape for a property's gallery.
#[derive(Debug, Clone, Serialize)]
pub struct ImageResponse {
    pub id: String,
    pub file_name: String,
    pub public_url: String,
    pub created_at: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.image_id,
            file_name: image.file_name,
            public_url: image.public_url,
            created_at: image.created_at,
        }
    }
}
