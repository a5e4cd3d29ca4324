use airmonitors::models::{self, Station};
use airmonitors::{AveragePeriod, Client, StationDataOptions};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn show(title: &str, payload: Option<Value>) -> Result<()> {
    println!("{title}");
    match payload {
        Some(v) => println!("{}", serde_json::to_string_pretty(&v)?),
        None => println!("  (no data)"),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Example program that walks every endpoint for the configured account.
    // Configure credentials via env vars or an `.airmonitorsrc` file.
    // Set RUST_LOG=airmonitors=debug to see request paths.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let client = Client::from_env().context("failed to configure Air Monitors client")?;

    show("Available analyser models:", client.list_analysers()?)?;
    show("Available sensors:", client.list_sensors()?)?;
    show("Available data sensors:", client.list_data_sensors()?)?;
    show("Available diagnostic sensors:", client.list_diagnostic_sensors()?)?;
    show("Available units:", client.list_units()?)?;
    show("Shared stations:", client.list_shared_stations()?)?;
    show("Owned stations:", client.list_owned_stations()?)?;
    show(
        "Stations within 100km of Greenwich (51.4779, 0.0015):",
        client.list_local_stations(51.4779, 0.0015, 100)?,
    )?;

    let stations: Vec<Station> = match client.list_stations()? {
        Some(payload) => models::decode(payload)?,
        None => Vec::new(),
    };
    println!("{} station(s) available", stations.len());

    let end = Utc::now();
    let start = end - Duration::hours(2);
    let window = format!("{} - {}", start.format("%F %T"), end.format("%F %T"));
    let averaged = StationDataOptions::new().with_average_period(AveragePeriod::Minutes30);

    for station in &stations {
        let name = format!("{} ({})", station.station_name, station.unique_id);

        show(
            &format!("Station setup for {name}:"),
            client.station_setup(&station.unique_id)?,
        )?;
        show(
            &format!("{name} has data for:"),
            client.station_period(&station.unique_id)?,
        )?;
        show(
            &format!("Calibration data for {name} {window}:"),
            client.calibration_data(start, end, &station.unique_id)?,
        )?;
        show(
            &format!("Data for {name} {window}:"),
            client.station_data(start, end, &station.unique_id, &StationDataOptions::default())?,
        )?;
        show(
            &format!("Latest data for {name}:"),
            client.latest_station_data(1, &station.unique_id, &StationDataOptions::default())?,
        )?;
        show(
            &format!("30 minute average data for {name} {window}:"),
            client.station_data(start, end, &station.unique_id, &averaged)?,
        )?;
    }

    Ok(())
}
