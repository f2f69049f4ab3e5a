//! Job DAG for pipeline renderers.

use crate::config::{Configuration, PartitionStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One operator in the job DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: u32,
    pub label: String,
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEdge {
    pub source: u32,
    pub target: u32,
}

/// Linear operator chain: Dataset, optional Partition and Cache, the two
/// join phases, then Write Output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelinePlan {
    pub nodes: Vec<PlanNode>,
    pub edges: Vec<PlanEdge>,
}

impl PipelinePlan {
    /// Builds the DAG for a configuration.
    pub fn from_config(config: &Configuration) -> Self {
        let mut labels = vec![format!("{} Dataset", config.dataset_size)];
        if config.partition_strategy != PartitionStrategy::None {
            labels.push(format!("{} Partition", config.partition_strategy));
        }
        if config.use_cache {
            labels.push("Cache".to_string());
        }
        labels.push(format!("{} Join Build", config.join_type));
        labels.push(format!("{} Join Probe", config.join_type));
        labels.push("Write Output".to_string());

        let nodes: Vec<PlanNode> = labels
            .into_iter()
            .zip(1u32..)
            .map(|(label, id)| PlanNode { id, label })
            .collect();

        let edges = nodes
            .windows(2)
            .map(|pair| PlanEdge {
                source: pair[0].id,
                target: pair[1].id,
            })
            .collect();

        Self { nodes, edges }
    }
}

impl fmt::Display for PipelinePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "[{}]", node.label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoinType;

    #[test]
    fn test_minimal_plan() {
        let plan = PipelinePlan::from_config(&Configuration::default());
        assert_eq!(plan.nodes.len(), 4);
        assert_eq!(plan.edges.len(), 3);
        assert_eq!(
            plan.to_string(),
            "[Small Dataset] -> [Shuffle Join Build] -> [Shuffle Join Probe] -> [Write Output]"
        );
    }

    #[test]
    fn test_full_plan() {
        let config = Configuration {
            partition_strategy: PartitionStrategy::Good,
            use_cache: true,
            join_type: JoinType::Broadcast,
            ..Default::default()
        };
        let plan = PipelinePlan::from_config(&config);
        let labels: Vec<&str> = plan.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Small Dataset",
                "Good Partition",
                "Cache",
                "Broadcast Join Build",
                "Broadcast Join Probe",
                "Write Output",
            ]
        );
        assert_eq!(plan.edges[1], PlanEdge { source: 2, target: 3 });
        assert_eq!(plan.edges.last(), Some(&PlanEdge { source: 5, target: 6 }));
    }
}
