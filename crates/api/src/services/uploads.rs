//! Uploaded image storage.
//!
//! Product images arrive as multipart file parts and are written to the
//! configured upload directory under a server-generated filename. The
//! stored name is a UUID plus a sanitized copy of the client extension, so
//! client-supplied names never reach the filesystem.

use std::path::Path;

use uuid::Uuid;

/// Errors produced while storing an uploaded image.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The multipart request carried no image file part.
    #[error("Image file is required")]
    MissingImage,

    /// The image file part was present but empty.
    #[error("uploaded image is empty")]
    EmptyImage,

    /// The file part declared a non-image content type.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Writing the file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Store an uploaded image and return the filename it was stored under.
///
/// # Errors
///
/// Returns `UploadError` if the part is not an image, is empty, or cannot
/// be written.
pub async fn store_image(
    dir: &Path,
    original_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, UploadError> {
    let content_type = content_type.unwrap_or("application/octet-stream");
    if !content_type.starts_with("image/") {
        return Err(UploadError::UnsupportedContentType(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(UploadError::EmptyImage);
    }

    let filename = unique_filename(original_name);
    tokio::fs::write(dir.join(&filename), bytes).await?;

    Ok(filename)
}

/// Build the public URL for a stored image filename.
#[must_use]
pub fn image_url(base_url: &str, filename: &str) -> String {
    format!("{}/uploads/{filename}", base_url.trim_end_matches('/'))
}

/// Generate a unique filename, keeping at most a short alphanumeric
/// extension from the client-supplied name.
fn unique_filename(original_name: Option<&str>) -> String {
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(char::is_ascii_alphanumeric)
                .take(8)
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    match ext {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}
