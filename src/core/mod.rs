//! Core abstractions and shared types

pub mod cache;
pub mod config;
pub mod currency;
pub mod envelope;
pub mod fingerprint;
pub mod log;
pub mod quote;
pub mod transport;

// Re-export main types for cleaner imports
pub use cache::CacheStore;
pub use currency::CurrencyRateProvider;
pub use envelope::{CacheEntry, QueryResult};
pub use quote::{CurrencyInfo, Quote};
pub use transport::{RequestDescriptor, RequestOptions, Transport, TransportResponse};
