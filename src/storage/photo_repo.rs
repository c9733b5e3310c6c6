use crate::models::Photo;

use super::backend::StoreResult;
use super::store::RecordStore;

pub const PHOTOS: &str = "photos";

pub async fn list_photos(store: &RecordStore) -> StoreResult<Vec<Photo>> {
    store.load(PHOTOS).await
}

pub async fn append_photo(store: &RecordStore, photo: &Photo) -> StoreResult<()> {
    store.append(PHOTOS, photo).await
}

pub async fn delete_photo(store: &RecordStore, id: &str) -> StoreResult<bool> {
    store.delete(PHOTOS, id).await
}

pub async fn find_photo(store: &RecordStore, id: &str) -> StoreResult<Option<Photo>> {
    let photos = list_photos(store).await?;
    Ok(photos.into_iter().find(|photo| photo.id == id))
}
