//! Product image uploads.
//!
//! A single `image` form field is accepted, capped at 5 MiB, and both the
//! file extension and the declared content type must match the image
//! allow-list. Stored files get a collision-free name (millisecond prefix
//! plus random suffix, original extension preserved).

use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Image reference used when a product is created without an upload.
pub const PLACEHOLDER_IMG: &str = "/uploads/placeholder.jpg";

/// Upper bound on an uploaded image body.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Subdirectory of the upload root holding product images.
pub const PRODUCT_SUBDIR: &str = "products";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only image files are allowed (jpg, png, gif, webp)")]
    DisallowedType,
    #[error("Image exceeds the 5 MiB size limit")]
    TooLarge,
    #[error("failed to store uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Check a declared file name and content type against the allow-list.
/// Returns the lowercased extension on success.
pub fn validate_image(file_name: &str, content_type: Option<&str>) -> Result<String, UploadError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or(UploadError::DisallowedType)?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(UploadError::DisallowedType);
    }

    // Both checks must pass: extension alone is caller-controlled text.
    let content_type = content_type.ok_or(UploadError::DisallowedType)?;
    let subtype = content_type
        .strip_prefix("image/")
        .ok_or(UploadError::DisallowedType)?;
    let subtype = if subtype == "jpg" { "jpeg" } else { subtype };
    if !ALLOWED_EXTENSIONS.contains(&subtype) {
        return Err(UploadError::DisallowedType);
    }

    Ok(ext)
}

/// Collision-avoiding stored name: time prefix, random suffix, original
/// extension.
fn unique_file_name(ext: &str) -> String {
    let mut rng = rand::rng();
    let suffix: u32 = rng.random();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

/// Validate and persist an uploaded product image. Returns the public
/// path stored as the product's image reference.
pub async fn store_product_image(
    upload_dir: &Path,
    file_name: &str,
    content_type: Option<&str>,
    data: &[u8],
) -> Result<String, UploadError> {
    let ext = validate_image(file_name, content_type)?;
    if data.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge);
    }

    let dir: PathBuf = upload_dir.join(PRODUCT_SUBDIR);
    tokio::fs::create_dir_all(&dir).await?;

    let stored_name = unique_file_name(&ext);
    tokio::fs::write(dir.join(&stored_name), data).await?;

    Ok(format!("/uploads/{}/{}", PRODUCT_SUBDIR, stored_name))
}
