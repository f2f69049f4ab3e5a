//! SparkSim Interactive Simulator
//!
//! Drives the [`sparksim_core`] cost model the way the editor does: a
//! [`Session`] holds the active configuration and challenge level, and every
//! change is followed by an explicit [`Session::evaluate`].
//!
//! # Usage
//!
//! ```
//! use sparksim::{Session, RunReport};
//! use sparksim_core::{Configuration, LevelSet};
//!
//! let levels = LevelSet::builtin().unwrap();
//! let mut session = Session::new(Configuration::default());
//! session.select_level(levels.get(1).unwrap().clone());
//!
//! let snapshot = session.evaluate().clone();
//! assert!(snapshot.score.is_some());
//!
//! let report = RunReport::new(snapshot, session.level()).with_plan();
//! assert!(report.plan.is_some());
//! ```

mod report;
mod session;

pub use report::{LevelSummary, RunReport, SimReport};
pub use session::{Session, Snapshot};
