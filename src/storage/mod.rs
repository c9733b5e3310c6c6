pub mod backend;
pub mod carpool_repo;
pub mod photo_repo;
pub mod rsvp_repo;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, StoreBackend, StoreError, StoreResult};
pub use store::RecordStore;
