pub mod seed;
pub mod store;
pub mod types;

pub use store::{DocumentStore, StoreError, StoreEvent, Versioned};
pub use types::*;
