//! JSON reports of evaluated runs.

use crate::session::Snapshot;
use serde::Serialize;
use sparksim_core::{
    breakdown, generate_code, CostBreakdown, Level, PartitionLayout, PipelinePlan,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Level summary attached to a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub id: u32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<f64>,
}

impl From<&Level> for LevelSummary {
    fn from(level: &Level) -> Self {
        Self {
            id: level.id,
            title: level.title.clone(),
            max_points: level.max_points,
        }
    }
}

/// One evaluated run, plus whichever projections were requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelSummary>,

    #[serde(flatten)]
    pub snapshot: Snapshot,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PipelinePlan>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<PartitionLayout>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl RunReport {
    /// Creates a report from a snapshot.
    pub fn new(snapshot: Snapshot, level: Option<&Level>) -> Self {
        let warnings = snapshot
            .config
            .warnings()
            .iter()
            .map(ToString::to_string)
            .collect();

        Self {
            level: level.map(LevelSummary::from),
            snapshot,
            warnings,
            breakdown: None,
            plan: None,
            layout: None,
            code: None,
        }
    }

    /// Attaches the unrounded cost breakdown.
    pub fn with_breakdown(mut self) -> Self {
        self.breakdown = Some(breakdown(&self.snapshot.config));
        self
    }

    /// Attaches the job DAG.
    pub fn with_plan(mut self) -> Self {
        self.plan = Some(PipelinePlan::from_config(&self.snapshot.config));
        self
    }

    /// Attaches the on-disk file layout.
    pub fn with_layout(mut self) -> Self {
        self.layout = Some(PartitionLayout::from_config(&self.snapshot.config));
        self
    }

    /// Attaches the sample program.
    pub fn with_code(mut self) -> Self {
        self.code = Some(generate_code(&self.snapshot.config));
        self
    }
}

/// Complete export of a CLI invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimReport {
    pub runs: Vec<RunReport>,
}

impl SimReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a run.
    pub fn add_run(&mut self, run: RunReport) {
        self.runs.push(run);
    }

    /// Renders as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use sparksim_core::{Configuration, JoinType, LevelSet};

    #[test]
    fn test_free_play_report_json() {
        let mut session = Session::new(Configuration::default());
        let run = RunReport::new(session.evaluate().clone(), None);

        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["metrics"]["time"], 119);
        assert_eq!(json["config"]["joinType"], "Shuffle");
        assert!(json.get("score").is_none());
        assert!(json.get("level").is_none());
        assert!(json.get("breakdown").is_none());
    }

    #[test]
    fn test_level_report_with_projections() {
        let levels = LevelSet::builtin().unwrap();
        let level = levels.get(1).unwrap();
        let mut session = Session::default();
        session.select_level(level.clone());

        let run = RunReport::new(session.evaluate().clone(), session.level())
            .with_breakdown()
            .with_plan()
            .with_layout()
            .with_code();

        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["score"], 598);
        assert_eq!(json["level"]["id"], 1);
        assert_eq!(json["level"]["maxPoints"], 1000.0);
        assert_eq!(json["breakdown"]["joinPlan"], "Shuffle");
        assert_eq!(json["plan"]["nodes"][0]["label"], "Medium Dataset");
        assert!(json["code"].as_str().unwrap().contains("format(\"csv\")"));
        // Medium CSV orders: 60 GB in one file
        assert_eq!(json["layout"]["tables"][0]["files"][0]["name"], "all_data.csv");
        assert_eq!(json["layout"]["tables"][0]["onDiskGb"], 60.0);
    }

    #[test]
    fn test_report_carries_warnings() {
        let config = Configuration {
            join_type: JoinType::Broadcast,
            ..Default::default()
        };
        let mut session = Session::new(config);
        let run = RunReport::new(session.evaluate().clone(), None);
        assert_eq!(run.warnings.len(), 1);
        assert!(run.warnings[0].contains("falls back to shuffle"));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut report = SimReport::new();
        let mut session = Session::default();
        report.add_run(RunReport::new(session.evaluate().clone(), None));
        report.write_to_file(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["runs"][0]["metrics"]["networkTimeline"][1]["stage"], "Shuffle");
    }
}
