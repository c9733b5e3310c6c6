use std::path::Path;

use chrono::Utc;
use tracing::warn;

use crate::models::{timestamp_id, Photo};
use crate::storage::{photo_repo, RecordStore, StoreResult};

pub const PHOTO_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Writes the image to the uploads directory and records its metadata.
/// The stored filename is the record id plus the original extension, so the
/// file can always be traced back to its metadata row.
pub async fn store_photo(
    store: &RecordStore,
    uploads_dir: &Path,
    original_name: &str,
    uploaded_by: &str,
    caption: Option<String>,
    bytes: &[u8],
) -> StoreResult<Photo> {
    let id = timestamp_id();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let filename = format!("{id}{extension}");

    tokio::fs::create_dir_all(uploads_dir).await?;
    tokio::fs::write(uploads_dir.join(&filename), bytes).await?;

    let photo = Photo {
        id,
        filename,
        original_name: original_name.to_string(),
        uploaded_by: uploaded_by.to_string(),
        caption,
        created_at: Utc::now(),
    };
    photo_repo::append_photo(store, &photo).await?;
    Ok(photo)
}

/// Removes the metadata row and, best effort, the image file. A file that is
/// already gone should not stop the row from being cleaned up, and vice versa.
pub async fn remove_photo(
    store: &RecordStore,
    uploads_dir: &Path,
    id: &str,
) -> StoreResult<bool> {
    let Some(photo) = photo_repo::find_photo(store, id).await? else {
        return Ok(false);
    };
    photo_repo::delete_photo(store, id).await?;
    if let Err(err) = tokio::fs::remove_file(uploads_dir.join(&photo.filename)).await {
        warn!("could not remove photo file {}: {}", photo.filename, err);
    }
    Ok(true)
}

/// Uploaded filenames are generated server side, so anything with path
/// structure in it never came from us.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains("..")
}

pub fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}
