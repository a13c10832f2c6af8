//! `docker stats --no-stream --format '{{json .}}'` decoding.
//!
//! One JSON object per container. Every value is a display string
//! (`"12.5%"`, `"150MiB / 1GiB"`), normalized here to numbers and bytes.
//! Older engines keyed rows by `Container` instead of `ID`/`Name`; both
//! shapes are accepted, newest first.

use serde::Deserialize;
use tracing::debug;

use super::{JsonLinesDecoder, RawOutput};
use crate::aggregate::summarize_stats;
use crate::model::{Completeness, ContainerStats, StatsResult};
use crate::normalize::{percent_to_f64, size_pair};

/// Current row shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurrentRow {
    #[serde(rename = "ID")]
    id: String,
    name: String,
    #[serde(flatten)]
    values: RowValues,
}

/// Legacy row shape (`Container` holds the name or short id).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyRow {
    container: String,
    #[serde(flatten)]
    values: RowValues,
}

#[derive(Debug, Default, Deserialize)]
struct RowValues {
    #[serde(rename = "CPUPerc", default)]
    cpu_perc: String,
    #[serde(rename = "MemUsage", default)]
    mem_usage: String,
    #[serde(rename = "MemPerc", default)]
    mem_perc: String,
    #[serde(rename = "NetIO", default)]
    net_io: String,
    #[serde(rename = "BlockIO", default)]
    block_io: String,
    #[serde(rename = "PIDs", default)]
    pids: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatsRow {
    Current(CurrentRow),
    Legacy(LegacyRow),
}

impl StatsRow {
    fn into_stats(self) -> ContainerStats {
        let (id, name, values) = match self {
            Self::Current(row) => (row.id, Some(row.name), row.values),
            Self::Legacy(row) => (row.container, None, row.values),
        };

        let (memory_usage_bytes, memory_limit_bytes) = size_pair(&values.mem_usage);
        let (net_rx_bytes, net_tx_bytes) = size_pair(&values.net_io);
        let (block_read_bytes, block_write_bytes) = size_pair(&values.block_io);

        ContainerStats {
            id,
            name,
            cpu_percent: percent_to_f64(&values.cpu_perc),
            memory_usage_bytes,
            memory_limit_bytes,
            memory_percent: percent_to_f64(&values.mem_perc),
            net_rx_bytes,
            net_tx_bytes,
            block_read_bytes,
            block_write_bytes,
            pids: values.pids.trim().parse().unwrap_or(0),
        }
    }
}

/// Decode one stats row per line.
#[must_use]
pub fn decode(raw: &RawOutput) -> StatsResult {
    let mut decoder = JsonLinesDecoder::new();
    let rows: Vec<StatsRow> = decoder.decode(&raw.stdout);
    let stats = decoder.stats();

    let completeness = if stats.nothing_decoded() {
        if let Some(first) = stats.skipped.first() {
            debug!(
                skipped = stats.lines_skipped,
                line = first.line,
                error = %first.message,
                preview = %first.content_preview,
                "No stats rows decoded"
            );
        }
        Completeness::NoData
    } else {
        Completeness::Complete
    };

    let containers: Vec<ContainerStats> = rows.into_iter().map(StatsRow::into_stats).collect();
    let summary = summarize_stats(&containers);

    StatsResult {
        success: raw.success(),
        completeness,
        containers,
        summary,
        error: raw.error_text(),
    }
}
