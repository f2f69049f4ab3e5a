//! Cost Model Engine
//! =================
//!
//! Maps a [`Configuration`] to a metrics vector in a single pass:
//!
//! 1. Resolve workers and raw dataset GB from the lookup tables
//! 2. Split raw GB across tables and apply the format factor
//! 3. Derive per-stage volumes (read, shuffle or broadcast, compute, write)
//! 4. Convert volumes to the network timeline and the time estimate
//! 5. Estimate CPU and memory utilization
//!
//! Every function here is pure. The same configuration always yields
//! bit-identical output.

use crate::config::{Configuration, DatasetSize, FileFormat, JoinType, SkewKey, Table};
use crate::tables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of the modeled job, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Read,
    Shuffle,
    Compute,
    Write,
}

impl Stage {
    /// All stages in the fixed timeline order.
    pub const ALL: [Stage; 4] = [Stage::Read, Stage::Shuffle, Stage::Compute, Stage::Write];

    /// Returns the stage label.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Read => "Read",
            Stage::Shuffle => "Shuffle",
            Stage::Compute => "Compute",
            Stage::Write => "Write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Network volume of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTraffic {
    pub stage: Stage,
    #[serde(rename = "networkMB")]
    pub network_mb: u64,
}

/// The engine output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Elapsed time in model time units
    pub time: u64,
    /// CPU utilization percentage in [5, 100]
    pub cpu: u32,
    /// Memory utilization percentage in [5, 100]
    pub memory: u32,
    /// Exactly four entries: Read, Shuffle, Compute, Write
    pub network_timeline: Vec<StageTraffic>,
}

impl Metrics {
    /// Total network volume across all stages in MB.
    pub fn total_network_mb(&self) -> u64 {
        self.network_timeline.iter().map(|t| t.network_mb).sum()
    }

    /// Network volume of one stage in MB.
    pub fn stage_mb(&self, stage: Stage) -> u64 {
        self.network_timeline
            .iter()
            .find(|t| t.stage == stage)
            .map(|t| t.network_mb)
            .unwrap_or(0)
    }
}

/// How the join was actually executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinPlan {
    /// Both sides redistributed by key
    Shuffle,
    /// Secondary side replicated to every worker
    Broadcast,
    /// Broadcast requested but the secondary side exceeded the threshold
    BroadcastFallback,
    /// Unrecognized join type: no join traffic
    NoJoin,
}

/// Raw and on-disk volume of one join side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableVolume {
    pub table: Table,
    pub raw_gb: f64,
    pub on_disk_gb: f64,
}

impl TableVolume {
    fn resolve(table: Table, dataset: DatasetSize, format: FileFormat) -> Self {
        Self {
            table,
            raw_gb: tables::table_raw_gb(table, dataset),
            on_disk_gb: tables::table_on_disk_gb(table, dataset, format),
        }
    }
}

/// Every intermediate quantity of one estimate, before rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub workers: u32,
    pub total_raw_gb: f64,
    pub primary: TableVolume,
    pub secondary: TableVolume,
    pub join_plan: JoinPlan,

    pub read_gb: f64,
    pub shuffle_gb: f64,
    pub broadcast_gb: f64,
    pub spill_gb: f64,
    pub compute_gb: f64,
    pub write_gb: f64,

    /// Time before the final rounding
    pub time_units: f64,

    /// CPU load before rounding and clamping
    pub cpu_load: f64,

    pub cluster_memory_gb: f64,
    pub cached_gb: f64,
    pub partition_overhead_gb: f64,
    pub memory_used_gb: f64,
}

impl CostBreakdown {
    /// Volume of one stage in GB.
    pub fn stage_gb(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Read => self.read_gb,
            Stage::Shuffle => self.shuffle_gb,
            Stage::Compute => self.compute_gb,
            Stage::Write => self.write_gb,
        }
    }

    /// Rounds and clamps into the public metrics vector.
    pub fn metrics(&self) -> Metrics {
        let network_timeline = Stage::ALL
            .iter()
            .map(|&stage| StageTraffic {
                stage,
                network_mb: round_half_up(self.stage_gb(stage) * tables::GB_TO_MB) as u64,
            })
            .collect();

        let memory_percent = round_half_up(self.memory_used_gb / self.cluster_memory_gb * 100.0);

        Metrics {
            time: round_half_up(self.time_units) as u64,
            cpu: clamp_percent(round_half_up(self.cpu_load)),
            memory: clamp_percent(memory_percent),
            network_timeline,
        }
    }
}

/// Estimates time, CPU, memory and per-stage network volume.
pub fn estimate(config: &Configuration) -> Metrics {
    breakdown(config).metrics()
}

/// Computes every intermediate of the cost model.
pub fn breakdown(config: &Configuration) -> CostBreakdown {
    // 1. Numeric parameters
    let workers = tables::workers(config.cluster_size);
    let worker_count = f64::from(workers);
    let total_raw_gb = tables::raw_dataset_gb(config.dataset_size);

    // 2. Join sides
    let primary = TableVolume::resolve(config.join_primary, config.dataset_size, config.file_format);
    let secondary =
        TableVolume::resolve(config.join_secondary, config.dataset_size, config.file_format);

    // 3. Each table is read once; caching does not avoid the first read
    let read_gb = primary.on_disk_gb + secondary.on_disk_gb;

    // 4. Join stage
    let shuffle_volume = || {
        let combined = primary.on_disk_gb + secondary.on_disk_gb;
        if config.aqe_enabled {
            combined * tables::AQE_SHUFFLE_FACTOR
        } else {
            combined
        }
    };

    let (join_plan, shuffle_gb, broadcast_gb) = match config.join_type {
        JoinType::Shuffle => (JoinPlan::Shuffle, shuffle_volume(), 0.0),
        JoinType::Broadcast if secondary.on_disk_gb <= tables::BROADCAST_THRESHOLD_GB => {
            let mut broadcast = secondary.on_disk_gb * worker_count;
            if config.skewed && config.skew_key == SkewKey::OrderId {
                broadcast *= tables::BROADCAST_SKEW_FACTOR;
            }
            (JoinPlan::Broadcast, 0.0, broadcast)
        }
        JoinType::Broadcast => (JoinPlan::BroadcastFallback, shuffle_volume(), 0.0),
        JoinType::Other => (JoinPlan::NoJoin, 0.0, 0.0),
    };

    // 5. Compute = spill on raw volume + broadcast
    let spill_gb =
        tables::spill_factor(config.partition_strategy) * (primary.raw_gb + secondary.raw_gb);
    let compute_gb = spill_gb + broadcast_gb;

    // 6. Output is about the size of the larger side
    let write_gb = primary.raw_gb.max(secondary.raw_gb) * tables::format_factor(config.file_format);

    // 7. Time: stage costs, then parallelism, skew and cache in that order
    let stage_time = read_gb * tables::stage_cost_per_gb(Stage::Read)
        + shuffle_gb * tables::stage_cost_per_gb(Stage::Shuffle)
        + compute_gb * tables::stage_cost_per_gb(Stage::Compute)
        + write_gb * tables::stage_cost_per_gb(Stage::Write);

    let mut time_units = stage_time / worker_count;
    if config.skewed {
        time_units *= tables::SKEW_TIME_PENALTY;
    }
    if config.use_cache {
        time_units *= tables::CACHE_TIME_DISCOUNT;
    }

    // 8. CPU
    let mut cpu_load = tables::CPU_BASE_PERCENT + total_raw_gb * tables::CPU_PER_RAW_GB
        - worker_count * tables::CPU_RELIEF_PER_WORKER;
    if config.aqe_enabled {
        cpu_load -= tables::CPU_AQE_RELIEF;
    }
    if config.skewed {
        cpu_load *= tables::CPU_SKEW_FACTOR;
    }

    // 9. Memory
    let cluster_memory_gb = worker_count * tables::MEMORY_PER_WORKER_GB;
    let cached_gb = if config.use_cache {
        primary.on_disk_gb * tables::CACHE_EXPANSION_FACTOR
    } else {
        0.0
    };
    let partition_overhead_gb =
        f64::from(tables::partition_count(config.partition_strategy)) * tables::PARTITION_FOOTPRINT_GB;
    let mut memory_used_gb = cached_gb + partition_overhead_gb;
    if config.skewed {
        memory_used_gb *= tables::MEMORY_SKEW_FACTOR;
    }

    CostBreakdown {
        workers,
        total_raw_gb,
        primary,
        secondary,
        join_plan,
        read_gb,
        shuffle_gb,
        broadcast_gb,
        spill_gb,
        compute_gb,
        write_gb,
        time_units,
        cpu_load,
        cluster_memory_gb,
        cached_gb,
        partition_overhead_gb,
        memory_used_gb,
    }
}

/// Rounds to the nearest integer, halves toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn clamp_percent(value: f64) -> u32 {
    value.clamp(tables::PERCENT_FLOOR, tables::PERCENT_CEILING) as u32
}
