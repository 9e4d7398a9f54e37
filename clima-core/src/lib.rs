//! Core library for the `clima` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - HTTP clients for the geocoding and weather services
//! - The persistent search history store
//! - Shared domain models
//!
//! It is used by `clima-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod geocoding;
pub mod history;
pub mod model;
pub mod weather;

pub use config::{Config, Credentials};
pub use geocoding::GeocodingClient;
pub use history::SearchHistory;
pub use model::{PlaceCandidate, WeatherSnapshot};
pub use weather::WeatherClient;
