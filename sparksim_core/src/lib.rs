//! SparkSim Core - Deterministic Cost Model for a Distributed Join Job
//!
//! Models a four-stage job (Read, Shuffle, Compute, Write) and estimates how
//! configuration knobs affect it:
//! 1. **Volume model**: table sizes from dataset size, split ratios and file format
//! 2. **Join model**: shuffle vs. broadcast, with silent fallback past 1 GB
//! 3. **Resource model**: time, CPU% and memory% with skew, cache and AQE factors
//!
//! Everything here is a pure function of a [`Configuration`] snapshot.
//!
//! ```
//! use sparksim_core::{estimate, Configuration, Stage};
//!
//! let metrics = estimate(&Configuration::default());
//! assert_eq!(metrics.time, 119);
//! assert_eq!(metrics.stage_mb(Stage::Read), 4608);
//! ```

pub mod codegen;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod levels;
pub mod plan;
pub mod scoring;
pub mod tables;

// Re-export key types for convenience
pub use codegen::generate_code;
pub use config::{
    ClusterSize, ConfigWarning, Configuration, DatasetSize, FileFormat, JoinKey, JoinType,
    PartitionStrategy, SkewKey, Table,
};
pub use engine::{breakdown, estimate, CostBreakdown, JoinPlan, Metrics, Stage, StageTraffic};
pub use error::SimError;
pub use layout::{LayoutWarning, PartitionFile, PartitionLayout, TableLayout};
pub use levels::{Level, LevelSet};
pub use plan::PipelinePlan;
pub use scoring::score;
