use serde::Serialize;

use crate::models::Rsvp;
use crate::storage::{rsvp_repo, RecordStore, StoreResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSummary {
    pub total: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub total_guests: i64,
}

/// Aggregate attendance numbers for the public site. Individual entries stay
/// behind the admin endpoints.
pub async fn load_rsvp_summary(store: &RecordStore) -> StoreResult<RsvpSummary> {
    let rsvps = rsvp_repo::list_rsvps(store).await?;
    Ok(build_summary(&rsvps))
}

fn build_summary(rsvps: &[Rsvp]) -> RsvpSummary {
    let attending = rsvps.iter().filter(|r| r.attending).count();
    let total_guests = rsvps
        .iter()
        .filter(|r| r.attending)
        .map(|r| if r.guest_count == 0 { 1 } else { r.guest_count })
        .sum();

    RsvpSummary {
        total: rsvps.len(),
        attending,
        not_attending: rsvps.len() - attending,
        total_guests,
    }
}
