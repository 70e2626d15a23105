//! Core business logic abstractions

pub mod config;
pub mod converter;
pub mod currency;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use converter::{Conversion, ConversionError, RateStore};
pub use currency::RateTableProvider;
pub use rates::RateTable;
