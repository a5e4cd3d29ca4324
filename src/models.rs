//! Typed views over the records the API returns.
//!
//! The client itself is schema-agnostic; these are conveniences for callers
//! who want structs instead of [`serde_json::Value`]. Fields the API documents
//! as nullable are `Option`s.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::paths::StationId;

/// Decodes a payload returned by one of the [`Client`](crate::Client) methods.
pub fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(Error::Decode)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sensor {
    pub sensor_name: String,
    pub sensor_label: String,
    /// `Data` or `Diagnostic`.
    #[serde(rename = "Type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Unit {
    pub unit_name: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Station {
    #[serde(alias = "uniqueId")]
    pub unique_id: StationId,
    pub station_type: String,
    pub station_name: String,
    pub serial_number: String,
    pub firmware: String,
    #[serde(default, rename = "IMSI")]
    pub imsi: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Owning customer; only present on shared stations.
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// One channel of a station's current setup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelSetup {
    #[serde(default)]
    pub channel: Option<i64>,
    pub sensor_name: String,
    pub sensor_label: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub unit_name: String,
    pub unit: String,
    pub rate: i64,
}

/// One timestamped record from the station data endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationRecord {
    #[serde(rename = "TBTimestamp")]
    pub tb_timestamp: String,
    #[serde(rename = "TETimestamp")]
    pub te_timestamp: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub channels: Vec<ChannelReading>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChannelReading {
    pub sensor_name: String,
    pub sensor_label: String,
    #[serde(default)]
    pub channel: Option<i64>,
    pub pre_scaled: f64,
    pub scaled: f64,
    pub unit_name: String,
    pub slope: f64,
    pub offset: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationPeriod {
    #[serde(rename = "FirstTBTimestamp")]
    pub first_tb_timestamp: String,
    #[serde(rename = "FirstTETimestamp")]
    pub first_te_timestamp: String,
    #[serde(rename = "LastTBTimestamp")]
    pub last_tb_timestamp: String,
    #[serde(rename = "LastTETimestamp")]
    pub last_te_timestamp: String,
}
