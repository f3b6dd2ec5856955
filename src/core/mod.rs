//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod money;

// Re-export main types for cleaner imports
pub use catalog::{CurrencyCatalog, CurrencyInfo};
pub use converter::{Conversion, ConversionRequest, Converter};
pub use currency::CurrencyRateProvider;
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryLog, HistoryStore};
