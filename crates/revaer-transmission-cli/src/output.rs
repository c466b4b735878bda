//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use revaer_transmission::{AddedTorrent, Arguments, FreeSpace};
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_torrent_list(torrents: &[Value], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(torrents)?,
        OutputFormat::Table => {
            println!(
                "{:>5} {:<13} {:>7} {:>12} {:>12} NAME",
                "ID", "STATUS", "PROG", "DOWN", "UP"
            );
            for torrent in torrents {
                println!("{}", torrent_row(torrent));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_added(added: &AddedTorrent, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(added)?,
        OutputFormat::Table => {
            let verb = if added.duplicate {
                "already present"
            } else {
                "added"
            };
            println!("{verb}: {} (id: {}, hash: {})", added.name, added.id, added.hash_string);
        }
    }
    Ok(())
}

pub(crate) fn render_arguments(arguments: &Arguments, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(arguments)?,
        OutputFormat::Table => {
            for (key, value) in arguments {
                println!("{key}: {}", format_value(value));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_free_space(space: &FreeSpace, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(space)?,
        OutputFormat::Table => {
            let free = u64::try_from(space.size_bytes)
                .map_or_else(|_| "unknown".to_string(), format_bytes);
            println!("{}: {free} free", space.path);
        }
    }
    Ok(())
}

pub(crate) fn render_ack(action: &str, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({"action": action, "result": "success"}))?,
        OutputFormat::Table => println!("{action}: ok"),
    }
    Ok(())
}

pub(crate) fn render_flag(label: &str, value: bool, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ label: value }))?,
        OutputFormat::Table => println!("{label}: {}", if value { "yes" } else { "no" }),
    }
    Ok(())
}

pub(crate) fn render_count(label: &str, value: u64, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ label: value }))?,
        OutputFormat::Table => println!("{label}: {value}"),
    }
    Ok(())
}

fn torrent_row(torrent: &Value) -> String {
    let id = torrent
        .get("id")
        .and_then(Value::as_i64)
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    let status = torrent
        .get("status")
        .and_then(Value::as_i64)
        .map_or("-", status_label);
    let progress = torrent
        .get("percentDone")
        .and_then(Value::as_f64)
        .map_or_else(|| "-".to_string(), |done| format!("{:.1}%", done * 100.0));
    let down = rate(torrent.get("rateDownload"));
    let up = rate(torrent.get("rateUpload"));
    let name = torrent
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>");
    format!("{id:>5} {status:<13} {progress:>7} {down:>12} {up:>12} {name}")
}

fn rate(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_u64)
        .map_or_else(|| "-".to_string(), |bytes| format!("{}/s", format_bytes(bytes)))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Daemon torrent status code as a label.
#[must_use]
pub(crate) const fn status_label(code: i64) -> &'static str {
    match code {
        0 => "stopped",
        1 => "check-wait",
        2 => "checking",
        3 => "download-wait",
        4 => "downloading",
        5 => "seed-wait",
        6 => "seeding",
        _ => "unknown",
    }
}

#[must_use]
pub(crate) fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    let value = bytes_to_f64(bytes);
    if value >= GIB {
        format!("{:.2} GiB", value / GIB)
    } else if value >= MIB {
        format!("{:.2} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.2} KiB", value / KIB)
    } else {
        format!("{bytes} B")
    }
}

fn bytes_to_f64(value: u64) -> f64 {
    let high = u32::try_from(value >> 32).unwrap_or(u32::MAX);
    let low = u32::try_from(value & 0xFFFF_FFFF).unwrap_or(u32::MAX);
    f64::from(high) * 4_294_967_296.0 + f64::from(low)
}
