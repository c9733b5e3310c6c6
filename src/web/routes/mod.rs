pub mod admin;
pub mod carpool;
pub mod event;
pub mod health;
pub mod photos;
pub mod rsvp;
