//! A blocking Rust client for the Air Monitors air-quality monitoring API.
//!
//! Every call builds a request path from typed arguments, issues a single GET
//! against `{base}/GET/{account}/{licence}{path}` and returns the decoded JSON.
//! `Ok(None)` means the API answered that nothing matched the query.
//!
//! ## Quick start
//! - Pass credentials to [`Client::new`], or configure them via environment
//!   variables (`AIRMONITORS_ACCOUNT_ID`, `AIRMONITORS_LICENCE_KEY`) or an
//!   `.airmonitorsrc` file and call [`Client::from_env`].
//! - Call an endpoint method. Payloads are [`serde_json::Value`]; see
//!   [`models`] for typed views.
//!
//! ```no_run
//! use airmonitors::{AveragePeriod, Client, StationDataOptions};
//! use chrono::{Duration, Utc};
//!
//! fn main() -> Result<(), airmonitors::Error> {
//!     let client = Client::new("ACCOUNT", "xxxx-xxxx-xxxx-xxxx")?;
//!     let end = Utc::now();
//!     let start = end - Duration::hours(2);
//!
//!     let options = StationDataOptions::new()
//!         .with_average_period(AveragePeriod::Minutes30)
//!         .with_sensors(["NO2", "PM10"]);
//!
//!     match client.station_data(start, end, 1001u64, &options)? {
//!         Some(records) => println!("{records:#}"),
//!         None => println!("no data"),
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
pub mod models;
mod params;
pub mod paths;

pub use client::{Client, ClientConfig, DEFAULT_BASE_URL, NO_DATA_SENTINEL};
pub use config::load_config;
pub use error::{Error, Result};
pub use params::{AveragePeriod, SensorType, TimeConvention};
pub use paths::{StationDataOptions, StationId, Timestamp};
