//! Lookup tables and constants that parameterize the cost model.
//!
//! Each table is an exhaustive `match`, so adding a knob value without a
//! cost entry fails to compile. `Other` arms hold the neutral defaults.

use crate::config::{ClusterSize, DatasetSize, FileFormat, PartitionStrategy, Table};
use crate::engine::Stage;

// =============================================================================
// UNITS AND THRESHOLDS
// =============================================================================

/// Megabytes per gigabyte for the network timeline.
pub const GB_TO_MB: f64 = 1024.0;

/// Largest secondary side (on-disk GB) that may be broadcast.
pub const BROADCAST_THRESHOLD_GB: f64 = 1.0;

/// Adaptive query execution shrinks shuffle volume to 70%.
pub const AQE_SHUFFLE_FACTOR: f64 = 0.7;

/// Broadcast volume grows 20% when skew is keyed on `order_id`.
pub const BROADCAST_SKEW_FACTOR: f64 = 1.2;

// =============================================================================
// TIME
// =============================================================================

/// Skewed jobs take 20% longer.
pub const SKEW_TIME_PENALTY: f64 = 1.2;

/// Caching the primary table saves 10%.
pub const CACHE_TIME_DISCOUNT: f64 = 0.9;

// =============================================================================
// CPU
// =============================================================================

pub const CPU_BASE_PERCENT: f64 = 20.0;
pub const CPU_PER_RAW_GB: f64 = 2.0;
pub const CPU_RELIEF_PER_WORKER: f64 = 1.0;
pub const CPU_AQE_RELIEF: f64 = 5.0;
pub const CPU_SKEW_FACTOR: f64 = 1.1;

// =============================================================================
// MEMORY
// =============================================================================

/// Each worker contributes 10 GB of memory.
pub const MEMORY_PER_WORKER_GB: f64 = 10.0;

/// Cached data takes 1.5x its on-disk size in memory.
pub const CACHE_EXPANSION_FACTOR: f64 = 1.5;

/// Footprint of one partition.
pub const PARTITION_FOOTPRINT_GB: f64 = 0.01;

pub const MEMORY_SKEW_FACTOR: f64 = 1.1;

// =============================================================================
// FILE LAYOUT
// =============================================================================

/// Tables below this on-disk size count as small when laying out partitions.
pub const SMALL_TABLE_THRESHOLD_GB: f64 = 1.0;

/// Share of a skewed table that lands in its hot partition.
pub const HOT_PARTITION_SHARE: f64 = 0.4;

/// Partition files below this size are flagged.
pub const SMALL_PARTITION_GB: f64 = 0.1;

/// Utilization percentages are clamped to this range.
pub const PERCENT_FLOOR: f64 = 5.0;
pub const PERCENT_CEILING: f64 = 100.0;

/// Number of workers for a cluster size. Never zero.
pub fn workers(cluster: ClusterSize) -> u32 {
    match cluster {
        ClusterSize::Small => 1,
        ClusterSize::Medium => 4,
        ClusterSize::Large => 8,
        ClusterSize::Other => 1,
    }
}

/// Total raw dataset volume in GB.
pub fn raw_dataset_gb(dataset: DatasetSize) -> f64 {
    match dataset {
        DatasetSize::Small => 10.0,
        DatasetSize::Medium => 100.0,
        DatasetSize::Large => 1000.0,
        DatasetSize::Other => 0.0,
    }
}

/// Fraction of the raw dataset held by each logical table.
pub fn table_share(table: Table) -> f64 {
    match table {
        Table::Orders => 0.6,
        Table::Customers => 0.3,
        Table::Products => 0.1,
        Table::Other => 0.0,
    }
}

/// On-disk size relative to raw size.
pub fn format_factor(format: FileFormat) -> f64 {
    match format {
        FileFormat::Parquet => 0.5,
        FileFormat::Csv => 1.0,
        FileFormat::Other => 1.0,
    }
}

/// Share of the joined raw volume that spills during compute.
pub fn spill_factor(strategy: PartitionStrategy) -> f64 {
    match strategy {
        PartitionStrategy::None => 0.5,
        PartitionStrategy::Bad => 0.25,
        PartitionStrategy::Good => 0.0,
        PartitionStrategy::Other => 0.0,
    }
}

/// Partition count used for the memory overhead estimate.
pub fn partition_count(strategy: PartitionStrategy) -> u32 {
    match strategy {
        PartitionStrategy::None => 1,
        PartitionStrategy::Bad => 10,
        PartitionStrategy::Good => 200,
        PartitionStrategy::Other => 1,
    }
}

/// Number of files a table is written as.
///
/// Independent of [`partition_count`]: good partitioning splits large tables
/// and keeps small ones whole, bad partitioning does the opposite.
pub fn layout_partition_count(strategy: PartitionStrategy, table_on_disk_gb: f64) -> u32 {
    let small = table_on_disk_gb < SMALL_TABLE_THRESHOLD_GB;
    match (strategy, small) {
        (PartitionStrategy::None, _) => 1,
        (PartitionStrategy::Good, true) => 1,
        (PartitionStrategy::Good, false) => 4,
        (_, true) => 4,
        (_, false) => 1,
    }
}

/// Time units charged per GB moved through a stage.
pub fn stage_cost_per_gb(stage: Stage) -> f64 {
    match stage {
        Stage::Read => 5.0,
        Stage::Shuffle => 10.0,
        Stage::Compute => 8.0,
        Stage::Write => 5.0,
    }
}

/// Raw GB of one table.
pub fn table_raw_gb(table: Table, dataset: DatasetSize) -> f64 {
    raw_dataset_gb(dataset) * table_share(table)
}

/// On-disk GB of one table.
pub fn table_on_disk_gb(table: Table, dataset: DatasetSize, format: FileFormat) -> f64 {
    table_raw_gb(table, dataset) * format_factor(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workers_never_zero() {
        for cluster in ClusterSize::ALL.iter().chain([ClusterSize::Other].iter()) {
            assert!(workers(*cluster) >= 1);
        }
    }

    #[test]
    fn test_table_shares_sum_to_one() {
        let total: f64 = Table::ALL.iter().map(|t| table_share(*t)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_layout_partition_count() {
        assert_eq!(layout_partition_count(PartitionStrategy::None, 300.0), 1);
        assert_eq!(layout_partition_count(PartitionStrategy::Good, 3.0), 4);
        assert_eq!(layout_partition_count(PartitionStrategy::Good, 0.5), 1);
        assert_eq!(layout_partition_count(PartitionStrategy::Bad, 3.0), 1);
        assert_eq!(layout_partition_count(PartitionStrategy::Bad, 0.5), 4);
        // Exactly at the threshold is large
        assert_eq!(layout_partition_count(PartitionStrategy::Good, 1.0), 4);
    }

    #[test]
    fn test_on_disk_sizes() {
        assert_eq!(table_on_disk_gb(Table::Orders, DatasetSize::Small, FileFormat::Parquet), 3.0);
        assert_eq!(table_on_disk_gb(Table::Customers, DatasetSize::Small, FileFormat::Parquet), 1.5);
        assert_eq!(table_on_disk_gb(Table::Products, DatasetSize::Small, FileFormat::Csv), 1.0);
        assert_eq!(table_on_disk_gb(Table::Other, DatasetSize::Large, FileFormat::Csv), 0.0);
    }
}
