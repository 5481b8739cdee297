//! radio logger simulation

use std::time::Duration;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use radio_logger_core::{classify, PacketKind};
use radio_logger_radio::{Column, LogTable, MoteId};
use radio_logger_sim::scenarios::{self, SessionReport};
use radio_logger_sim::SimulationPresets;

const TICKS: u64 = 200;
const ROWS_SHOWN: usize = 12;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("decode") => {
            let hex_payload = args.get(1).context("usage: radio_sim decode <hex payload>")?;
            decode(hex_payload)
        }
        Some("--json") => dump_json().await,
        None => run_presets().await,
        Some(other) => bail!("unknown argument {:?} (expected `decode <hex>` or `--json`)", other),
    }
}

fn decode(hex_payload: &str) -> Result<()> {
    let payload = hex::decode(hex_payload.trim()).context("payload is not valid hex")?;
    let packet = classify(&payload);

    println!("{}", packet.summary().bright_green().bold());
    println!();
    println!("{}", packet.details());
    Ok(())
}

async fn dump_json() -> Result<()> {
    let mut config = SimulationPresets::quiet_network();
    config.seed = Some(1);
    let report = scenarios::logging_session(config, 50, None, None).await?;

    println!("{}", serde_json::to_string_pretty(&report.to_json()?)?);
    Ok(())
}

async fn run_presets() -> Result<()> {
    println!("{}", "Radio Logger Simulation".bright_blue().bold());
    println!("{}", "=======================".bright_blue());

    let presets = vec![
        ("Quiet Network", SimulationPresets::quiet_network()),
        ("Busy Network", SimulationPresets::busy_network()),
        ("Legacy Radios", SimulationPresets::legacy_radios()),
    ];

    for (name, config) in presets {
        println!("{}", format!("\n>>> {}", name).bright_green().bold());
        println!("Motes: {}", config.motes);
        println!("Packet radios: {}%", (config.packet_radio_share * 100.0) as u32);
        println!("Transmissions per tick: {}", config.transmissions_per_tick);
        println!("Envelope bytes: {}", config.envelope_len);
        println!();

        let progress = ProgressBar::new(TICKS);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} ticks")
                .context("invalid progress template")?,
        );
        let report = scenarios::logging_session(
            config,
            TICKS,
            Some(Duration::from_millis(2)),
            Some(&progress),
        )
        .await?;
        progress.finish_and_clear();

        print_report(&report)?;
        println!("{}", "-".repeat(60));
    }

    println!("\n{}", "All sessions complete!".bright_green().bold());
    Ok(())
}

fn print_report(report: &SessionReport) -> Result<()> {
    let table = LogTable::new(report.reader.clone(), |mote: MoteId| {
        log::debug!("highlight {}", mote);
    });

    println!(
        "{:>8}  {:<20}  {:<12}  {}",
        Column::Time.name().bold(),
        Column::From.name().bold(),
        Column::To.name().bold(),
        Column::Data.name().bold()
    );
    for row in 0..table.row_count().min(ROWS_SHOWN) {
        let data = table.cell(row, Column::Data)?;
        let data = if data.starts_with("AODV RREQ") {
            data.yellow()
        } else if data.starts_with("AODV RREP") {
            data.cyan()
        } else {
            data.normal()
        };
        println!(
            "{:>8}  {:<20}  {:<12}  {}",
            table.cell(row, Column::Time)?,
            table.cell(row, Column::From)?,
            table.cell(row, Column::To)?,
            data
        );
    }
    if table.row_count() > ROWS_SHOWN {
        println!("... {} more", table.row_count() - ROWS_SHOWN);
    }

    // one detailed view per packet kind
    for kind in [PacketKind::RouteRequest, PacketKind::RouteReply, PacketKind::Unknown] {
        let found = (0..table.row_count()).find(|&row| {
            report
                .reader
                .with_record(row, |r| r.decode().map(|p| p.kind()) == Some(kind))
                .unwrap_or(false)
        });
        if let Some(row) = found {
            let mote = table.select_row(row)?;
            println!(
                "\n{} (row {}, {})",
                format!("{} details", kind).bright_yellow(),
                row,
                mote.map(|m| m.to_string()).unwrap_or_else(|| "no mote".to_string())
            );
            println!("{}", table.tooltip(row, Column::Data)?);
            println!("Receivers: {}", table.destination_choices(row)?.join(", "));
        }
    }

    println!();
    println!("Ticks: {}", report.stats.ticks);
    println!("Connections: {}", report.stats.connections);
    println!("Bytes sent: {}", report.stats.bytes_sent);
    for (kind, count) in &report.counts.by_kind {
        println!("  {}: {}", kind, count);
    }
    println!("  no payload: {}", report.counts.no_payload);
    Ok(())
}
