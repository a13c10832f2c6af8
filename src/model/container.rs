//! Container tooling results: compose lifecycle actions and resource stats.

use serde::{Deserialize, Serialize};

use super::{is_false, Completeness};

/// Kind of compose-managed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A service container.
    Container,
    /// A project network.
    Network,
    /// A named volume.
    Volume,
    /// A built or pulled image.
    Image,
}

impl EntityKind {
    /// Display name as printed by compose.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Container => "Container",
            Self::Network => "Network",
            Self::Volume => "Volume",
            Self::Image => "Image",
        }
    }
}

/// Canonical lifecycle action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAction {
    /// Created (or recreated).
    Created,
    /// Started or running.
    Started,
    /// Stopped or killed.
    Stopped,
    /// Removed.
    Removed,
}

impl EntityAction {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Removed => "removed",
        }
    }
}

/// One compose entity with its merged state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeEntity {
    /// Entity kind.
    pub kind: EntityKind,
    /// Entity name as printed (e.g. `web-1`, `app_default`).
    pub name: String,
    /// Final action reached; absent if only an error was reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EntityAction>,
    /// Distinct actions in the order they were reported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<EntityAction>,
    /// An error marker was reported for this entity.
    #[serde(default, skip_serializing_if = "is_false")]
    pub failed: bool,
    /// Elapsed time of the last completed step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
}

/// Counts by final action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeSummary {
    /// Number of distinct entities.
    pub total: usize,
    /// Entities whose final action is `created`.
    pub created: usize,
    /// Entities whose final action is `started`.
    pub started: usize,
    /// Entities whose final action is `stopped`.
    pub stopped: usize,
    /// Entities whose final action is `removed`.
    pub removed: usize,
    /// Entities with an error marker.
    pub failed: usize,
}

/// Result of a compose lifecycle command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposeResult {
    /// Tool exit classification.
    pub success: bool,
    /// Entities in first-reported order.
    pub entities: Vec<ComposeEntity>,
    /// Derived counts.
    pub summary: ComposeSummary,
    /// Error lines printed by compose on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resource usage of one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStats {
    /// Container ID.
    pub id: String,
    /// Container name; legacy output only carries the ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CPU usage percent.
    pub cpu_percent: f64,
    /// Memory in use.
    pub memory_usage_bytes: u64,
    /// Memory limit.
    pub memory_limit_bytes: u64,
    /// Memory usage percent of limit.
    pub memory_percent: f64,
    /// Network bytes received.
    pub net_rx_bytes: u64,
    /// Network bytes sent.
    pub net_tx_bytes: u64,
    /// Block device bytes read.
    pub block_read_bytes: u64,
    /// Block device bytes written.
    pub block_write_bytes: u64,
    /// Process count.
    pub pids: u64,
}

/// Aggregate resource usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Number of containers.
    pub containers: usize,
    /// Summed CPU percent.
    pub total_cpu_percent: f64,
    /// Summed memory usage.
    pub total_memory_bytes: u64,
}

/// Result of `docker stats --no-stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResult {
    /// Tool exit classification.
    pub success: bool,
    /// `no_data` when output was present but no line decoded.
    #[serde(default)]
    pub completeness: Completeness,
    /// One entry per container line.
    pub containers: Vec<ContainerStats>,
    /// Derived totals.
    pub summary: StatsSummary,
    /// Tool error output on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
