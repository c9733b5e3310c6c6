use serde::Serialize;

use crate::models::{CarpoolDriver, CarpoolPassenger};
use crate::storage::{carpool_repo, RecordStore, StoreResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpoolOverview {
    pub drivers: Vec<CarpoolDriver>,
    pub passengers: Vec<CarpoolPassenger>,
    pub stats: CarpoolStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarpoolStats {
    pub total_drivers: usize,
    pub total_passengers: usize,
    pub total_seats: i64,
}

/// Everything the carpool board shows: who is offering, who is looking, and
/// how many seats are on offer in total.
pub async fn load_carpool_overview(store: &RecordStore) -> StoreResult<CarpoolOverview> {
    let drivers = carpool_repo::list_drivers(store).await?;
    let passengers = carpool_repo::list_passengers(store).await?;
    let stats = CarpoolStats {
        total_drivers: drivers.len(),
        total_passengers: passengers.len(),
        total_seats: drivers.iter().map(|d| d.available_seats).sum(),
    };
    Ok(CarpoolOverview {
        drivers,
        passengers,
        stats,
    })
}
