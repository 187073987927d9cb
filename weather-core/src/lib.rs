//! Core library for the disaster-management weather panel.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Request building, HTTP transport and response interpretation
//! - Disaster alert derivation from forecasts
//! - The search session (last-submission-wins) and station directory cache
//!
//! It is used by `disaster-weather-cli`, but can also back other front ends.

pub mod alert;
pub mod client;
pub mod config;
pub mod error;
pub mod interpret;
pub mod model;
pub mod request;
pub mod session;
pub mod stations;
pub mod transport;

pub use alert::{Alert, AlertKind, Severity, derive_alerts};
pub use client::WeatherClient;
pub use config::Config;
pub use error::{ApiErrorKind, WeatherError};
pub use model::{SearchCriteria, SearchMode, WeatherResult};
pub use session::{Completion, SearchSession, SearchState, Ticket, WeatherPanel};
pub use stations::{Station, StationCache, StationDirectory};
pub use transport::{HttpTransport, RawResponse, Transport};
