use serde::Serialize;

use crate::models::{CarpoolDriver, CarpoolPassenger};
use crate::storage::{carpool_repo, RecordStore, StoreResult};

use super::distance_service::{is_reasonable_distance, DistanceInfo, DistanceLookup};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverMatch {
    pub driver_id: String,
    pub driver_name: String,
    pub driver_location: String,
    pub distance: DistanceInfo,
    pub is_reasonable: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerMatches {
    pub passenger_id: String,
    pub passenger_name: String,
    pub passenger_location: String,
    pub matches: Vec<DriverMatch>,
}

/// Pairs every passenger with every driver, closest driver first.
///
/// Lookups run sequentially; the free Distance Matrix tier throttles hard
/// and the lists here are tiny. A pair the lookup cannot resolve is left
/// out of that passenger's matches, so every passenger still gets an entry
/// even when all of their lookups fail.
pub async fn match_carpools(
    passengers: &[CarpoolPassenger],
    drivers: &[CarpoolDriver],
    lookup: &dyn DistanceLookup,
) -> Vec<PassengerMatches> {
    let mut results = Vec::with_capacity(passengers.len());

    for passenger in passengers {
        let mut matches = Vec::new();
        for driver in drivers {
            let Some(distance) = lookup
                .driving_distance(&passenger.pickup_location, &driver.departure_location)
                .await
            else {
                continue;
            };
            let is_reasonable = is_reasonable_distance(distance.distance_value);
            matches.push(DriverMatch {
                driver_id: driver.id.clone(),
                driver_name: driver.name.clone(),
                driver_location: driver.departure_location.clone(),
                distance,
                is_reasonable,
            });
        }

        matches.sort_by_key(|m| m.distance.distance_value);

        results.push(PassengerMatches {
            passenger_id: passenger.id.clone(),
            passenger_name: passenger.name.clone(),
            passenger_location: passenger.pickup_location.clone(),
            matches,
        });
    }

    results
}

/// Store-backed entry point for the matches endpoint. Without a configured
/// lookup there is nothing to compute and the result is empty.
pub async fn load_carpool_matches(
    store: &RecordStore,
    lookup: Option<&dyn DistanceLookup>,
) -> StoreResult<Vec<PassengerMatches>> {
    let Some(lookup) = lookup else {
        return Ok(Vec::new());
    };
    let passengers = carpool_repo::list_passengers(store).await?;
    let drivers = carpool_repo::list_drivers(store).await?;
    Ok(match_carpools(&passengers, &drivers, lookup).await)
}
