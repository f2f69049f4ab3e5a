//! On-disk file layout of the three tables.
//!
//! Shows how partitioning and skew split each table into `part-NNNNN`
//! files under `/data/<table>/`. File sizes are rounded to hundredths of a
//! GB, as a directory listing would show them.

use crate::config::{Configuration, PartitionStrategy, Table};
use crate::engine::round_half_up;
use crate::tables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionFile {
    pub name: String,
    pub size_gb: f64,
}

/// Sizing problem in a table layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutWarning {
    /// Skew left one partition below the small-file size
    SmallPartition { min_gb: f64 },
    /// Evenly sized partitions are all below the small-file size
    SmallPartitions { size_gb: f64 },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::SmallPartition { min_gb } => {
                write!(f, "One partition is only {:.2} GB (very small)", min_gb)
            }
            LayoutWarning::SmallPartitions { size_gb } => {
                write!(f, "Partitions are small ({:.2} GB each)", size_gb)
            }
        }
    }
}

/// Files of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayout {
    pub table: Table,
    pub on_disk_gb: f64,
    pub partition_count: u32,
    pub files: Vec<PartitionFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<LayoutWarning>,
}

impl TableLayout {
    /// Directory holding this table's files.
    pub fn directory(&self) -> String {
        format!("/data/{}/", self.table.name().to_lowercase())
    }

    fn build(table: Table, config: &Configuration) -> Self {
        let on_disk_gb =
            tables::table_on_disk_gb(table, config.dataset_size, config.file_format);
        let extension = config.file_format.name().to_lowercase();

        if config.partition_strategy == PartitionStrategy::None {
            return Self {
                table,
                on_disk_gb,
                partition_count: 1,
                files: vec![PartitionFile {
                    name: format!("all_data.{}", extension),
                    size_gb: on_disk_gb,
                }],
                warning: None,
            };
        }

        let partition_count = tables::layout_partition_count(config.partition_strategy, on_disk_gb);
        let part_name = |i: u32| format!("part-{:05}.{}", i, extension);

        // Only the orders table is skewed, and only when it has more than one file
        if config.skewed && table == Table::Orders && partition_count > 1 {
            let hot_gb = round_hundredths(on_disk_gb * tables::HOT_PARTITION_SHARE);
            let rest_gb = round_hundredths((on_disk_gb - hot_gb) / f64::from(partition_count - 1));

            let mut files = vec![PartitionFile {
                name: part_name(0),
                size_gb: hot_gb,
            }];
            files.extend((1..partition_count).map(|i| PartitionFile {
                name: part_name(i),
                size_gb: rest_gb,
            }));

            let min_gb = files.iter().map(|f| f.size_gb).fold(f64::INFINITY, f64::min);
            let warning = (min_gb < tables::SMALL_PARTITION_GB)
                .then_some(LayoutWarning::SmallPartition { min_gb });

            return Self {
                table,
                on_disk_gb,
                partition_count,
                files,
                warning,
            };
        }

        let size_gb = round_hundredths(on_disk_gb / f64::from(partition_count));
        let files = (0..partition_count)
            .map(|i| PartitionFile {
                name: part_name(i),
                size_gb,
            })
            .collect();
        let warning =
            (size_gb < tables::SMALL_PARTITION_GB).then_some(LayoutWarning::SmallPartitions { size_gb });

        Self {
            table,
            on_disk_gb,
            partition_count,
            files,
            warning,
        }
    }
}

/// Layout of every table, in Orders, Customers, Products order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionLayout {
    pub total_on_disk_gb: f64,
    pub tables: Vec<TableLayout>,
}

impl PartitionLayout {
    /// Lays out all three tables for a configuration.
    pub fn from_config(config: &Configuration) -> Self {
        let tables: Vec<TableLayout> = Table::ALL
            .iter()
            .map(|&table| TableLayout::build(table, config))
            .collect();
        let total_on_disk_gb = tables.iter().map(|t| t.on_disk_gb).sum();

        Self {
            total_on_disk_gb,
            tables,
        }
    }

    /// Layout of one table.
    pub fn table(&self, table: Table) -> Option<&TableLayout> {
        self.tables.iter().find(|t| t.table == table)
    }
}

fn round_hundredths(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatasetSize, FileFormat};

    fn sizes(layout: &TableLayout) -> Vec<f64> {
        layout.files.iter().map(|f| f.size_gb).collect()
    }

    #[test]
    fn test_unpartitioned_single_file() {
        let layout = PartitionLayout::from_config(&Configuration::default());
        assert_eq!(layout.total_on_disk_gb, 5.0);

        let orders = layout.table(Table::Orders).unwrap();
        assert_eq!(orders.directory(), "/data/orders/");
        assert_eq!(orders.partition_count, 1);
        assert_eq!(orders.files[0].name, "all_data.parquet");
        assert_eq!(orders.files[0].size_gb, 3.0);
        assert_eq!(orders.warning, None);
    }

    #[test]
    fn test_good_partitioning_splits_large_tables() {
        let config = Configuration {
            partition_strategy: PartitionStrategy::Good,
            ..Default::default()
        };
        let layout = PartitionLayout::from_config(&config);

        let orders = layout.table(Table::Orders).unwrap();
        assert_eq!(orders.partition_count, 4);
        assert_eq!(sizes(orders), vec![0.75; 4]);
        assert_eq!(orders.files[3].name, "part-00003.parquet");

        // 1.5 / 4 = 0.375
        assert_eq!(sizes(layout.table(Table::Customers).unwrap()), vec![0.38; 4]);

        let products = layout.table(Table::Products).unwrap();
        assert_eq!(products.partition_count, 1);
        assert_eq!(products.files[0].name, "part-00000.parquet");
    }

    #[test]
    fn test_bad_partitioning_splits_small_tables() {
        let config = Configuration {
            partition_strategy: PartitionStrategy::Bad,
            file_format: FileFormat::Csv,
            ..Default::default()
        };
        let layout = PartitionLayout::from_config(&config);
        assert_eq!(layout.table(Table::Orders).unwrap().partition_count, 1);
        // 1.0 GB on disk is not small
        assert_eq!(layout.table(Table::Products).unwrap().partition_count, 1);

        let parquet = Configuration { file_format: FileFormat::Parquet, ..config };
        let products = PartitionLayout::from_config(&parquet);
        let products = products.table(Table::Products).unwrap();
        assert_eq!(products.partition_count, 4);
        assert_eq!(sizes(products), vec![0.13; 4]);
        assert_eq!(products.warning, None);
    }

    #[test]
    fn test_skew_creates_hot_orders_partition() {
        let config = Configuration {
            partition_strategy: PartitionStrategy::Good,
            skewed: true,
            ..Default::default()
        };
        let layout = PartitionLayout::from_config(&config);

        let orders = layout.table(Table::Orders).unwrap();
        assert_eq!(sizes(orders), vec![1.2, 0.6, 0.6, 0.6]);

        // Other tables stay even
        assert_eq!(sizes(layout.table(Table::Customers).unwrap()), vec![0.38; 4]);
    }

    #[test]
    fn test_empty_dataset_warns_about_small_files() {
        let config = Configuration {
            dataset_size: DatasetSize::Other,
            partition_strategy: PartitionStrategy::Bad,
            ..Default::default()
        };
        let layout = PartitionLayout::from_config(&config);
        let customers = layout.table(Table::Customers).unwrap();
        assert_eq!(customers.partition_count, 4);
        assert_eq!(customers.warning, Some(LayoutWarning::SmallPartitions { size_gb: 0.0 }));
        assert_eq!(
            customers.warning.unwrap().to_string(),
            "Partitions are small (0.00 GB each)"
        );

        let skewed = PartitionLayout::from_config(&Configuration { skewed: true, ..config });
        let orders = skewed.table(Table::Orders).unwrap();
        assert_eq!(orders.warning, Some(LayoutWarning::SmallPartition { min_gb: 0.0 }));
    }

    #[test]
    fn test_layout_json_shape() {
        let json = serde_json::to_value(PartitionLayout::from_config(&Configuration::default())).unwrap();
        assert_eq!(json["totalOnDiskGb"], 5.0);
        assert_eq!(json["tables"][1]["table"], "Customers");
        assert_eq!(json["tables"][1]["files"][0]["sizeGb"], 1.5);
        assert!(json["tables"][1].get("warning").is_none());
    }
}
