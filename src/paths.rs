//! Request path construction for every Air Monitors endpoint.
//!
//! Each function returns the suffix appended to
//! `{base}/GET/{account}/{licence}`. Optional filters always precede the
//! positional segments, in the order sensor type, time convention, average
//! period.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::params::{AveragePeriod, SensorType, TimeConvention};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// A value that can be rendered as an API timestamp.
///
/// The API expects `YYYY-MM-DDTHH:MM:SS+00:00`. The `+00:00` suffix is
/// written literally: zoned values are rendered with their own wall-clock
/// time, not converted to UTC first.
pub trait Timestamp {
    fn wall_clock(&self) -> NaiveDateTime;

    fn to_path_segment(&self) -> String {
        self.wall_clock().format(TIMESTAMP_FORMAT).to_string()
    }
}

impl Timestamp for NaiveDateTime {
    fn wall_clock(&self) -> NaiveDateTime {
        *self
    }
}

impl Timestamp for NaiveDate {
    fn wall_clock(&self) -> NaiveDateTime {
        self.and_time(chrono::NaiveTime::MIN)
    }
}

impl<Tz: TimeZone> Timestamp for DateTime<Tz> {
    fn wall_clock(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

impl<T: Timestamp + ?Sized> Timestamp for &T {
    fn wall_clock(&self) -> NaiveDateTime {
        (**self).wall_clock()
    }
}

/// Unique id of a monitoring station.
///
/// Station listings return the id as a string while most callers hold it as
/// a number; both convert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_segment(&self) -> Result<&str> {
        check_segment(&self.0, "station id")?;
        Ok(&self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&StationId> for StationId {
    fn from(id: &StationId) -> Self {
        id.clone()
    }
}

macro_rules! station_id_from_int {
    ($($t:ty),+) => {
        $(impl From<$t> for StationId {
            fn from(id: $t) -> Self {
                Self(id.to_string())
            }
        })+
    };
}

station_id_from_int!(u32, u64, i32, i64);

impl<'de> Deserialize<'de> for StationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// Optional filters for station data queries.
///
/// `sensors: None` queries every channel; `Some(vec![])` is rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationDataOptions {
    pub sensor_type: Option<SensorType>,
    pub time_convention: Option<TimeConvention>,
    pub average_period: Option<AveragePeriod>,
    pub sensors: Option<Vec<String>>,
}

impl StationDataOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor_type(mut self, sensor_type: SensorType) -> Self {
        self.sensor_type = Some(sensor_type);
        self
    }

    pub fn with_time_convention(mut self, time_convention: TimeConvention) -> Self {
        self.time_convention = Some(time_convention);
        self
    }

    pub fn with_average_period(mut self, average_period: AveragePeriod) -> Self {
        self.average_period = Some(average_period);
        self
    }

    pub fn with_sensors<I, S>(mut self, sensors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensors = Some(sensors.into_iter().map(Into::into).collect());
        self
    }
}

/// Accumulates `/`-separated segments.
#[derive(Debug)]
struct PathBuilder(String);

impl PathBuilder {
    fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    fn segment(mut self, segment: impl fmt::Display) -> Self {
        self.0.push('/');
        self.0.push_str(&segment.to_string());
        self
    }

    /// Appends the token unless the filter is absent or its token is empty.
    fn filter(self, token: Option<&str>) -> Self {
        match token {
            Some(t) if !t.is_empty() => self.segment(t),
            _ => self,
        }
    }

    fn sensors(self, sensors: Option<&[String]>) -> Result<Self> {
        match sensors {
            None => Ok(self),
            Some(list) => Ok(self.segment(sensor_list(list)?)),
        }
    }

    fn finish(self) -> String {
        self.0
    }
}

/// Rejects values that would not survive as a single path segment: URL
/// parsing splits on `/`, and cuts the path at `?` or `#`.
pub(crate) fn check_segment(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid(format!("{what} is empty")));
    }
    if let Some(c) = value
        .chars()
        .find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
    {
        return Err(Error::invalid(format!("{what} `{value}` contains {c:?}")));
    }
    Ok(())
}

fn sensor_list(sensors: &[String]) -> Result<String> {
    if sensors.is_empty() {
        return Err(Error::invalid(
            "sensor list is empty; pass None to query every sensor",
        ));
    }
    for name in sensors {
        check_segment(name, "sensor name")?;
    }
    Ok(sensors.join("-"))
}

fn coordinate(value: f64, limit: f64, name: &str) -> Result<String> {
    if !value.is_finite() || value.abs() > limit {
        return Err(Error::invalid(format!(
            "{name} {value} is outside -{limit}..={limit}"
        )));
    }
    Ok(format!("{value:.4}"))
}

pub fn analysers() -> String {
    "/analysers".to_string()
}

pub fn calibration_data(
    start: impl Timestamp,
    end: impl Timestamp,
    station: &StationId,
) -> Result<String> {
    Ok(PathBuilder::new("/calibrationdata")
        .segment(start.to_path_segment())
        .segment(end.to_path_segment())
        .segment(station.to_segment()?)
        .finish())
}

pub fn sensors() -> String {
    "/sensors".to_string()
}

pub fn data_sensors() -> String {
    "/sensors/data".to_string()
}

pub fn diagnostic_sensors() -> String {
    "/sensors/diagnostic".to_string()
}

pub fn stations() -> String {
    "/stations".to_string()
}

pub fn shared_stations() -> String {
    "/stations/shared".to_string()
}

pub fn owned_stations() -> String {
    "/stations/owned".to_string()
}

/// `/stations/{lat},{lon}/{distance_km}` with four decimal places.
pub fn local_stations(latitude: f64, longitude: f64, distance_km: u32) -> Result<String> {
    let lat = coordinate(latitude, 90.0, "latitude")?;
    let lon = coordinate(longitude, 180.0, "longitude")?;
    Ok(PathBuilder::new("/stations")
        .segment(format_args!("{lat},{lon}"))
        .segment(distance_km)
        .finish())
}

pub fn station_setup(station: &StationId) -> Result<String> {
    Ok(PathBuilder::new("/stations/setup")
        .segment(station.to_segment()?)
        .finish())
}

pub fn station_data(
    start: impl Timestamp,
    end: impl Timestamp,
    station: &StationId,
    options: &StationDataOptions,
) -> Result<String> {
    PathBuilder::new("/stationdata")
        .filter(options.sensor_type.map(SensorType::as_str))
        .filter(options.time_convention.map(TimeConvention::as_str))
        .filter(options.average_period.map(AveragePeriod::as_str))
        .segment(start.to_path_segment())
        .segment(end.to_path_segment())
        .segment(station.to_segment()?)
        .sensors(options.sensors.as_deref())
        .map(PathBuilder::finish)
}

/// The latest-records endpoint has no time convention segment; one set in
/// `options` is ignored.
pub fn latest_station_data(
    records: u32,
    station: &StationId,
    options: &StationDataOptions,
) -> Result<String> {
    PathBuilder::new("/stationdata")
        .filter(options.sensor_type.map(SensorType::as_str))
        .filter(options.average_period.map(AveragePeriod::as_str))
        .segment("latest")
        .segment(records)
        .segment(station.to_segment()?)
        .sensors(options.sensors.as_deref())
        .map(PathBuilder::finish)
}

pub fn station_period(station: &StationId) -> Result<String> {
    Ok(PathBuilder::new("/stationdata/period")
        .segment(station.to_segment()?)
        .finish())
}

pub fn units() -> String {
    "/units".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn calibration_data_orders_start_end_station() {
        let path = calibration_data(
            at(2024, 3, 1, 9, 5, 0),
            at(2024, 3, 1, 11, 0, 59),
            &StationId::from(1234u64),
        )
        .unwrap();
        assert_eq!(
            path,
            "/calibrationdata/2024-03-01T09:05:00+00:00/2024-03-01T11:00:59+00:00/1234"
        );
    }

    #[test]
    fn zoned_timestamps_keep_wall_clock_and_literal_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(local.to_path_segment(), "2024-06-01T14:30:00+00:00");

        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        assert_eq!(utc.to_path_segment(), "2024-06-01T14:30:00+00:00");

        let day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(day.to_path_segment(), "2024-01-31T00:00:00+00:00");
    }

    #[test]
    fn local_stations_uses_four_decimals() {
        assert_eq!(
            local_stations(51.4779, 0.0015, 100).unwrap(),
            "/stations/51.4779,0.0015/100"
        );
        assert_eq!(
            local_stations(-33.9, 151.21, 5).unwrap(),
            "/stations/-33.9000,151.2100/5"
        );
    }

    #[test]
    fn local_stations_rejects_bad_coordinates() {
        assert!(matches!(
            local_stations(91.0, 0.0, 10),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            local_stations(0.0, f64::NAN, 10),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn station_data_without_filters() {
        let path = station_data(
            at(2024, 3, 1, 0, 0, 0),
            at(2024, 3, 2, 0, 0, 0),
            &"AM-17".into(),
            &StationDataOptions::default(),
        )
        .unwrap();
        assert_eq!(
            path,
            "/stationdata/2024-03-01T00:00:00+00:00/2024-03-02T00:00:00+00:00/AM-17"
        );
    }

    #[test]
    fn station_data_appends_sensor_list_last() {
        let options = StationDataOptions::new().with_sensors(["NO2", "PM10"]);
        let path = station_data(
            at(2024, 3, 1, 0, 0, 0),
            at(2024, 3, 2, 0, 0, 0),
            &StationId::from(7u32),
            &options,
        )
        .unwrap();
        assert!(path.ends_with("/7/NO2-PM10"), "{path}");
    }

    #[test]
    fn station_data_filters_in_fixed_order() {
        let options = StationDataOptions::new()
            .with_average_period(AveragePeriod::Minutes30)
            .with_sensor_type(SensorType::Diagnostic)
            .with_time_convention(TimeConvention::TimeEnding);
        let path = station_data(
            at(2024, 3, 1, 0, 0, 0),
            at(2024, 3, 1, 6, 0, 0),
            &StationId::from(7u32),
            &options,
        )
        .unwrap();
        assert_eq!(
            path,
            "/stationdata/diagnostic/TimeEnding/AVG30/2024-03-01T00:00:00+00:00/2024-03-01T06:00:00+00:00/7"
        );
    }

    #[test]
    fn sensor_type_all_omits_the_segment() {
        let all = StationDataOptions::new().with_sensor_type(SensorType::All);
        let none = StationDataOptions::new();
        let start = at(2024, 3, 1, 0, 0, 0);
        let end = at(2024, 3, 1, 1, 0, 0);
        let station = StationId::from(9u32);

        let with_all = station_data(start, end, &station, &all).unwrap();
        assert_eq!(with_all, station_data(start, end, &station, &none).unwrap());
        assert!(!with_all.contains("//"));

        let latest = latest_station_data(1, &station, &all).unwrap();
        assert_eq!(latest, "/stationdata/latest/1/9");
    }

    #[test]
    fn empty_sensor_list_is_rejected() {
        let options = StationDataOptions {
            sensors: Some(Vec::new()),
            ..Default::default()
        };
        let err = latest_station_data(5, &StationId::from(1u32), &options).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));

        let options = StationDataOptions::new().with_sensors(["NO2", ""]);
        assert!(latest_station_data(5, &StationId::from(1u32), &options).is_err());
    }

    #[test]
    fn latest_station_data_skips_time_convention() {
        let options = StationDataOptions::new()
            .with_sensor_type(SensorType::Data)
            .with_time_convention(TimeConvention::TimeBeginning)
            .with_average_period(AveragePeriod::Hours1)
            .with_sensors(vec!["PM2.5".to_string()]);
        assert_eq!(
            latest_station_data(3, &StationId::from(42u64), &options).unwrap(),
            "/stationdata/data/AVG60/latest/3/42/PM2.5"
        );
    }

    #[test]
    fn station_scoped_paths() {
        let station = StationId::from("1001");
        assert_eq!(station_setup(&station).unwrap(), "/stations/setup/1001");
        assert_eq!(station_period(&station).unwrap(), "/stationdata/period/1001");
        assert!(station_period(&StationId::from("  ")).is_err());
        assert!(station_setup(&StationId::from("a/b")).is_err());
    }

    #[test]
    fn station_id_rejects_query_fragment_and_whitespace() {
        for id in ["1001?a=b", "1001#x", " 1001", "10 01", "1001\n"] {
            let err = station_setup(&StationId::from(id)).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "{id:?}: {err:?}");
        }
    }

    #[test]
    fn sensor_names_reject_query_fragment_and_whitespace() {
        for name in ["NO2#x", "NO2?a=b", "PM 10", "O3/"] {
            let options = StationDataOptions::new().with_sensors([name, "PM10"]);
            let err = latest_station_data(1, &StationId::from(1001u32), &options).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)), "{name:?}: {err:?}");
        }
    }

    #[test]
    fn station_id_deserialises_from_string_or_number() {
        let a: StationId = serde_json::from_str("\"1001\"").unwrap();
        let b: StationId = serde_json::from_str("1001").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"1001\"");
    }
}
