//! One-shot tabular rendering of a snapshot.

use crate::snapshot::{
    ConsensusSyncState,
    SyncSnapshot,
};
use std::io::{
    self,
    Write,
};

const EXECUTION_HEADERS: [&str; 5] = [
    "Current Block",
    "Local Highest",
    "Network Highest",
    "Local Diff",
    "Network Diff",
];
const BEACON_HEADERS: [&str; 5] = [
    "CL Slot",
    "CL Slot Distance",
    "CL Status",
    "CL Syncing",
    "CL Optimistic",
];
const HEIMDALL_HEADERS: [&str; 3] = ["CL Slot", "CL Slot Time", "CL Syncing"];

/// Header and value columns for the snapshot's chain profile.
pub fn columns(snapshot: &SyncSnapshot) -> (Vec<&'static str>, Vec<String>) {
    let execution = &snapshot.execution;
    let mut headers = EXECUTION_HEADERS.to_vec();
    let mut values = vec![
        execution.current_block().to_string(),
        execution.local_highest_block().to_string(),
        execution.network_highest_block().to_string(),
        execution.local_lag().to_string(),
        execution.network_lag().to_string(),
    ];

    match &snapshot.consensus {
        ConsensusSyncState::Beacon(state) => {
            headers.extend(BEACON_HEADERS);
            values.extend([
                state.current_slot.to_string(),
                state.sync_distance.to_string(),
                state.health_status.to_string(),
                state.is_syncing.to_string(),
                state.is_optimistic.to_string(),
            ]);
        }
        ConsensusSyncState::Heimdall(state) => {
            headers.extend(HEIMDALL_HEADERS);
            values.extend([
                state.current_slot.to_string(),
                format!("{:.6} ago", state.sync_distance),
                state.is_syncing.to_string(),
            ]);
        }
    }

    (headers, values)
}

/// Write `snapshot` as a bordered table with one header row and one value row.
pub fn render<W: Write>(snapshot: &SyncSnapshot, out: &mut W) -> io::Result<()> {
    let (headers, values) = columns(snapshot);
    let headers: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let widths: Vec<usize> = headers
        .iter()
        .zip(&values)
        .map(|(header, value)| header.len().max(value.len()))
        .collect();

    let border = widths.iter().fold(String::from("+"), |mut line, width| {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
        line
    });

    writeln!(out, "{border}")?;
    write_row(out, &headers, &widths)?;
    writeln!(out, "{border}")?;
    write_row(out, &values, &widths)?;
    writeln!(out, "{border}")
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    write!(out, "|")?;
    for (cell, width) in cells.iter().zip(widths) {
        write!(out, " {cell:<width$} |")?;
    }
    writeln!(out)
}
