//! Job configuration: the knobs a learner turns.
//!
//! Every knob is a closed enumeration with an extra `Other` arm. Parsing from
//! the command line is case-insensitive and rejects unknown values.
//! Deserializing matches labels exactly and maps anything else (other
//! spellings, null, numbers) to `Other`, which the cost model treats as a
//! neutral default.

use crate::error::SimError;
use crate::tables;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

macro_rules! knob {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Unrecognized value (neutral default in the cost model)
            Other,
        }

        impl $name {
            /// All recognized values, in editor order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the canonical label.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other => "Other",
                }
            }

            /// Exact, case-sensitive label match.
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Returns true for the `Other` arm.
            pub fn is_other(&self) -> bool {
                matches!(self, $name::Other)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl FromStr for $name {
            type Err = SimError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(if s.eq_ignore_ascii_case($label) {
                    return Ok($name::$variant);
                })+
                Err(SimError::unknown_option($kind, s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = serde_json::Value::deserialize(deserializer)?;
                Ok(raw
                    .as_str()
                    .and_then($name::from_label)
                    .unwrap_or($name::Other))
            }
        }
    };
}

knob! {
    /// Cluster size, resolved to a worker count.
    ClusterSize, "cluster size" {
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
    }
}

knob! {
    /// Total raw dataset size.
    DatasetSize, "dataset size" {
        Small => "Small",
        Medium => "Medium",
        Large => "Large",
    }
}

knob! {
    /// Quality of the partitioning applied before the join.
    PartitionStrategy, "partition strategy" {
        None => "None",
        Good => "Good",
        Bad => "Bad",
    }
}

knob! {
    /// On-disk serialization format.
    FileFormat, "file format" {
        Parquet => "Parquet",
        Csv => "CSV",
    }
}

knob! {
    /// Logical tables that can take part in the join.
    Table, "table" {
        Orders => "Orders",
        Customers => "Customers",
        Products => "Products",
    }
}

knob! {
    /// Join key column. Display only; no cost formula reads it.
    JoinKey, "join key" {
        CustomerId => "customer_id",
        ProductId => "product_id",
        OrderId => "order_id",
    }
}

knob! {
    /// Join execution strategy.
    JoinType, "join type" {
        Broadcast => "Broadcast",
        Shuffle => "Shuffle",
    }
}

knob! {
    /// Column the simulated skew is keyed on.
    SkewKey, "skew key" {
        RegionId => "region_id",
        CustomerId => "customer_id",
        ProductId => "product_id",
        OrderId => "order_id",
    }
}

/// A full snapshot of the job configuration.
///
/// Always fully populated: missing JSON fields take the editor defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub cluster_size: ClusterSize,
    pub dataset_size: DatasetSize,
    pub partition_strategy: PartitionStrategy,
    pub file_format: FileFormat,
    pub join_primary: Table,
    pub join_secondary: Table,
    pub join_key: JoinKey,
    pub join_type: JoinType,
    pub use_cache: bool,
    pub aqe_enabled: bool,
    pub skewed: bool,
    pub skew_key: SkewKey,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            cluster_size: ClusterSize::Small,
            dataset_size: DatasetSize::Small,
            partition_strategy: PartitionStrategy::None,
            file_format: FileFormat::Parquet,
            join_primary: Table::Orders,
            join_secondary: Table::Customers,
            join_key: JoinKey::CustomerId,
            join_type: JoinType::Shuffle,
            use_cache: false,
            aqe_enabled: false,
            skewed: false,
            skew_key: SkewKey::RegionId,
        }
    }
}

/// Non-blocking observations about a configuration.
///
/// None of these change the estimate; they explain surprising results.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// A field holds an unrecognized value and falls back to a neutral default
    UnknownValue { field: &'static str },

    /// Both join sides are the same table
    SelfJoin(Table),

    /// Broadcast requested but the secondary side is too large to broadcast
    BroadcastFallback { secondary_on_disk_gb: f64 },

    /// Skew is simulated on a key that has no numeric effect
    InertSkewKey(SkewKey),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnknownValue { field } => {
                write!(f, "{} is not recognized, using a neutral default", field)
            }
            ConfigWarning::SelfJoin(table) => write!(f, "{} is joined with itself", table),
            ConfigWarning::BroadcastFallback { secondary_on_disk_gb } => write!(
                f,
                "secondary side is {:.2} GB on disk (limit {} GB), broadcast falls back to shuffle",
                secondary_on_disk_gb,
                tables::BROADCAST_THRESHOLD_GB
            ),
            ConfigWarning::InertSkewKey(key) => {
                write!(f, "skew on {} only affects the global skew penalties", key)
            }
        }
    }
}

impl Configuration {
    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Collects warnings about this configuration, in field order.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let unknown = [
            ("clusterSize", self.cluster_size.is_other()),
            ("datasetSize", self.dataset_size.is_other()),
            ("partitionStrategy", self.partition_strategy.is_other()),
            ("fileFormat", self.file_format.is_other()),
            ("joinPrimary", self.join_primary.is_other()),
            ("joinSecondary", self.join_secondary.is_other()),
            ("joinKey", self.join_key.is_other()),
            ("joinType", self.join_type.is_other()),
            ("skewKey", self.skew_key.is_other()),
        ];
        warnings.extend(
            unknown
                .into_iter()
                .filter(|(_, is_other)| *is_other)
                .map(|(field, _)| ConfigWarning::UnknownValue { field }),
        );

        if self.join_primary == self.join_secondary && !self.join_primary.is_other() {
            warnings.push(ConfigWarning::SelfJoin(self.join_primary));
        }

        if self.join_type == JoinType::Broadcast {
            let secondary_on_disk_gb =
                tables::table_on_disk_gb(self.join_secondary, self.dataset_size, self.file_format);
            if secondary_on_disk_gb > tables::BROADCAST_THRESHOLD_GB {
                warnings.push(ConfigWarning::BroadcastFallback { secondary_on_disk_gb });
            }
        }

        if self.skewed && self.skew_key != SkewKey::OrderId {
            warnings.push(ConfigWarning::InertSkewKey(self.skew_key));
        }

        warnings
    }
}
