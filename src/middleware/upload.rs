use std::collections::HashMap;

use axum::extract::Multipart;

use crate::config;
use crate::error::ApiError;

/// File part read out of a multipart request, held fully in memory.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("bin")
    }
}

/// A parsed multipart form: at most one file (under the expected field
/// name) plus any accompanying text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

/// Drain a multipart request, enforcing the configured file size cap.
pub async fn read_upload(mut multipart: Multipart, file_field: &str) -> Result<UploadForm, ApiError> {
    let max_bytes = config::config().uploads.max_file_size_bytes;
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Upload error: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match file_name {
            Some(file_name) if name == file_field => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Upload error: {}", e)))?;
                if bytes.len() > max_bytes {
                    return Err(ApiError::bad_request("File too large. Maximum size is 5MB."));
                }
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Upload error: {}", e)))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}
