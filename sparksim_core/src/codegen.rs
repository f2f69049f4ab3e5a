//! Sample PySpark program for a configuration.
//!
//! A textual projection only; nothing here feeds back into the cost model.

use crate::config::{Configuration, JoinType, PartitionStrategy};
use std::fmt::Write;

/// Renders the job described by `config` as a PySpark snippet.
pub fn generate_code(config: &Configuration) -> String {
    let mut code = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(code, "# Spark Simulation Code (Cluster: {})", config.cluster_size);
    let _ = writeln!(
        code,
        "# Join: {} \u{2A1D} {} on {}",
        config.join_primary, config.join_secondary, config.join_key
    );
    let _ = writeln!(code, "spark.conf.set(\"spark.sql.adaptive.enabled\", {})", config.aqe_enabled);
    code.push('\n');

    let _ = writeln!(
        code,
        "df = spark.read.format(\"{}\").load(\"path/to/{}_dataset\")",
        config.file_format.name().to_lowercase(),
        config.dataset_size.name().to_lowercase()
    );
    code.push('\n');

    match config.partition_strategy {
        PartitionStrategy::None => code.push_str("# No explicit repartition\n"),
        PartitionStrategy::Good => code.push_str("df = df.repartition(4)\n"),
        _ => code.push_str("df = df.repartition(1)\n"),
    }
    code.push('\n');

    if config.use_cache {
        code.push_str("df.cache()\n");
    } else {
        code.push_str("# Not cached\n");
    }
    code.push('\n');

    code.push_str("df2 = spark.read.parquet(\"dim_table\")\n");
    let (import_line, join_expression) = if config.join_type == JoinType::Broadcast {
        ("from pyspark.sql.functions import broadcast", "join(broadcast(df2)")
    } else {
        ("", "join(df2")
    };
    code.push_str(import_line);
    code.push_str("\n\n");

    let _ = writeln!(code, "result = df.{} , \"{}\")", join_expression, config.join_key);
    code.push('\n');
    code.push_str("result.write.mode(\"overwrite\").parquet(\"output\")\n");

    code
}
