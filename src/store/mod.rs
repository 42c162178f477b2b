pub mod client;
pub mod query;

pub use client::{StoreClient, StoreError};
pub use query::Filter;
