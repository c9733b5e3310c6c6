pub mod carpool;
pub mod photo;
pub mod rsvp;

pub use carpool::{CarpoolDriver, CarpoolPassenger};
pub use photo::Photo;
pub use rsvp::Rsvp;

use chrono::Utc;

/// Millisecond-timestamp record id, matching the ids already present in the
/// data files. Collisions are only possible for two submissions in the same
/// millisecond, which this site will never see.
pub fn timestamp_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
