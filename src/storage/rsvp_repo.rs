use crate::models::Rsvp;

use super::backend::StoreResult;
use super::store::RecordStore;

pub const RSVPS: &str = "rsvps";

pub async fn list_rsvps(store: &RecordStore) -> StoreResult<Vec<Rsvp>> {
    store.load(RSVPS).await
}

pub async fn append_rsvp(store: &RecordStore, rsvp: &Rsvp) -> StoreResult<()> {
    store.append(RSVPS, rsvp).await
}

pub async fn delete_rsvp(store: &RecordStore, id: &str) -> StoreResult<bool> {
    store.delete(RSVPS, id).await
}
