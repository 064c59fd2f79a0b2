//! Rendering of the loaded table

use std::io::Write;

use anyhow::Result;
use pcm_config::{DeviceTable, NO_DEVICE};

use crate::Query;

/// Write the part of `table` selected by `query`
pub fn render<W: Write>(out: &mut W, table: &DeviceTable, query: Query) -> Result<()> {
    match query {
        Query::Slot { usecase, direction } => {
            writeln!(out, "{}", table.get_device_id(usecase, direction))?;
        }
        Query::Table { json: true } => {
            serde_json::to_writer_pretty(&mut *out, table)?;
            writeln!(out)?;
        }
        Query::Table { json: false } => {
            writeln!(out, "{:<24} {:>8} {:>8}", "USECASE", "PLAYBACK", "CAPTURE")?;
            for entry in table.iter() {
                writeln!(
                    out,
                    "{:<24} {:>8} {:>8}",
                    entry.usecase.as_str(),
                    format_id(entry.playback),
                    format_id(entry.capture)
                )?;
            }
        }
    }
    Ok(())
}

fn format_id(id: i32) -> String {
    if id == NO_DEVICE {
        "-".to_string()
    } else {
        id.to_string()
    }
}
