pub mod calendar_service;
pub mod carpool_service;
pub mod distance_service;
pub mod matcher_service;
pub mod photo_service;
pub mod rsvp_service;
