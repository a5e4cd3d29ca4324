use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::paths::{self, StationDataOptions, StationId, Timestamp};

/// Public Air Monitors API, version 3.5.
pub const DEFAULT_BASE_URL: &str = "https://api.airmonitors.net/3.5";

/// Body sent with HTTP 200 when a query matched no records.
pub const NO_DATA_SENTINEL: &str = "NO DATA WAS FOUND FOR YOUR GIVEN PARAMETERS";

#[derive(Clone)]
pub struct ClientConfig {
    /// Base API URL, typically [`DEFAULT_BASE_URL`].
    pub url: String,
    /// Air Monitors account id.
    pub account_id: String,
    /// Licence key issued for the account.
    pub licence_key: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("account_id", &self.account_id)
            .field("licence_key", &"<redacted>")
            .field("verify", &self.verify)
            .finish()
    }
}

/// Blocking client for the Air Monitors API.
///
/// Every method issues one fresh GET request. `Ok(None)` means the server
/// reported that nothing matched the query.
#[derive(Clone)]
pub struct Client {
    url: String,
    account_id: String,
    licence_key: String,

    http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the public API with the given credentials.
    pub fn new(account_id: impl Into<String>, licence_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig {
            url: DEFAULT_BASE_URL.to_string(),
            account_id: account_id.into(),
            licence_key: licence_key.into(),
            verify: true,
        })
    }

    /// Creates a client using environment variables and/or `.airmonitorsrc`.
    ///
    /// Precedence: `AIRMONITORS_URL` / `AIRMONITORS_ACCOUNT_ID` /
    /// `AIRMONITORS_LICENCE_KEY`, then the rc file named by `AIRMONITORS_RC`,
    /// `./.airmonitorsrc` or `~/.airmonitorsrc`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(load_config(None, None, None, None)?)
    }

    pub fn from_config(cfg: ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("airmonitors-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("airmonitors-rs")),
        );

        let mut builder = HttpClient::builder().default_headers(default_headers);
        if !cfg.verify {
            warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        Self::with_http_client(http, cfg)
    }

    /// Creates a client on top of a caller-built transport, e.g. one with a
    /// custom timeout or proxy. `cfg.verify` is ignored.
    pub fn with_http_client(http: HttpClient, cfg: ClientConfig) -> Result<Self> {
        let account_id = credential(cfg.account_id, "account id")?;
        let licence_key = credential(cfg.licence_key, "licence key")?;

        Ok(Self {
            url: cfg.url.trim_end_matches('/').to_string(),
            account_id,
            licence_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// All available analyser models.
    pub fn list_analysers(&self) -> Result<Option<Value>> {
        self.get(&paths::analysers())
    }

    /// Calibration records for a station between two timestamps (inclusive),
    /// most recent first.
    pub fn calibration_data(
        &self,
        start: impl Timestamp,
        end: impl Timestamp,
        station: impl Into<StationId>,
    ) -> Result<Option<Value>> {
        self.get(&paths::calibration_data(start, end, &station.into())?)
    }

    /// All sensor types.
    pub fn list_sensors(&self) -> Result<Option<Value>> {
        self.get(&paths::sensors())
    }

    pub fn list_data_sensors(&self) -> Result<Option<Value>> {
        self.get(&paths::data_sensors())
    }

    pub fn list_diagnostic_sensors(&self) -> Result<Option<Value>> {
        self.get(&paths::diagnostic_sensors())
    }

    /// Every station the account can see, shared ones included.
    pub fn list_stations(&self) -> Result<Option<Value>> {
        self.get(&paths::stations())
    }

    pub fn list_shared_stations(&self) -> Result<Option<Value>> {
        self.get(&paths::shared_stations())
    }

    pub fn list_owned_stations(&self) -> Result<Option<Value>> {
        self.get(&paths::owned_stations())
    }

    /// Stations within `distance_km` of a point. Stations without a
    /// position are never returned.
    pub fn list_local_stations(
        &self,
        latitude: f64,
        longitude: f64,
        distance_km: u32,
    ) -> Result<Option<Value>> {
        self.get(&paths::local_stations(latitude, longitude, distance_km)?)
    }

    /// Current channel setup of a station.
    pub fn station_setup(&self, station: impl Into<StationId>) -> Result<Option<Value>> {
        self.get(&paths::station_setup(&station.into())?)
    }

    /// Records for a station between two timestamps (inclusive), most recent
    /// first.
    pub fn station_data(
        &self,
        start: impl Timestamp,
        end: impl Timestamp,
        station: impl Into<StationId>,
        options: &StationDataOptions,
    ) -> Result<Option<Value>> {
        self.get(&paths::station_data(start, end, &station.into(), options)?)
    }

    /// The `records` most recent records for a station.
    pub fn latest_station_data(
        &self,
        records: u32,
        station: impl Into<StationId>,
        options: &StationDataOptions,
    ) -> Result<Option<Value>> {
        self.get(&paths::latest_station_data(records, &station.into(), options)?)
    }

    /// First and last timestamps a station has data for.
    pub fn station_period(&self, station: impl Into<StationId>) -> Result<Option<Value>> {
        self.get(&paths::station_period(&station.into())?)
    }

    pub fn list_units(&self) -> Result<Option<Value>> {
        self.get(&paths::units())
    }

    /// Issues a GET for `path` and decodes the payload into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.get(path)?
            .map(|value| serde_json::from_value(value).map_err(Error::Decode))
            .transpose()
    }

    /// Issues a GET for `path`, relative to `{base}/GET/{account}/{licence}`.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        debug!(path, "GET");

        let resp = self.http.get(self.request_url(path)).send()?;
        let status = resp.status();
        trace!(path, %status, "response received");

        let resp = resp.error_for_status()?;
        let body = resp.text()?;

        let payload = interpret_body(status, body)?;
        if payload.is_none() {
            debug!(path, %status, "no data");
        }
        Ok(payload)
    }

    fn request_url(&self, path: &str) -> String {
        format!(
            "{}/GET/{}/{}{}",
            self.url, self.account_id, self.licence_key, path
        )
    }
}

/// Credentials are sent exactly as given, so anything that would not form a
/// single path segment is rejected rather than altered.
fn credential(value: String, name: &str) -> Result<String> {
    // the error message would otherwise echo the secret
    paths::check_segment(&value, name).map_err(|_| {
        Error::invalid(format!(
            "{name} must be non-empty without whitespace, '/', '?' or '#'"
        ))
    })?;
    Ok(value)
}

/// Interprets a body received with a non-error status.
fn interpret_body(status: StatusCode, body: String) -> Result<Option<Value>> {
    if status != StatusCode::OK || body == NO_DATA_SENTINEL {
        return Ok(None);
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(Some(value)),
        Err(source) => Err(Error::Service { body, source }),
    }
}
