use crate::models::{CarpoolDriver, CarpoolPassenger};

use super::backend::StoreResult;
use super::store::RecordStore;

pub const DRIVERS: &str = "drivers";
pub const PASSENGERS: &str = "passengers";

pub async fn list_drivers(store: &RecordStore) -> StoreResult<Vec<CarpoolDriver>> {
    store.load(DRIVERS).await
}

pub async fn append_driver(store: &RecordStore, driver: &CarpoolDriver) -> StoreResult<()> {
    store.append(DRIVERS, driver).await
}

pub async fn delete_driver(store: &RecordStore, id: &str) -> StoreResult<bool> {
    store.delete(DRIVERS, id).await
}

pub async fn list_passengers(store: &RecordStore) -> StoreResult<Vec<CarpoolPassenger>> {
    store.load(PASSENGERS).await
}

pub async fn append_passenger(store: &RecordStore, passenger: &CarpoolPassenger) -> StoreResult<()> {
    store.append(PASSENGERS, passenger).await
}

pub async fn delete_passenger(store: &RecordStore, id: &str) -> StoreResult<bool> {
    store.delete(PASSENGERS, id).await
}
