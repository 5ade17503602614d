//! Shared types, region data, config, and error definitions for photocast.

pub mod config;
pub mod error;
pub mod region;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use region::RegionCode;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
