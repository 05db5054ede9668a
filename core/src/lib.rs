//! Student services operations analytics.
//!
//! Two batch stages with no shared runtime:
//!   - `generator`: deterministic synthetic interaction table
//!   - `report`: grouped KPIs, two hypothesis tests, charts, narrative
//!
//! The flat CSV table written by the first stage is the only thing the
//! second stage reads.

pub mod charts;
pub mod config;
pub mod error;
pub mod generator;
pub mod grouping;
pub mod interaction;
pub mod report;
pub mod rng;
pub mod stats;
pub mod table;
pub mod types;
pub mod views;

pub use config::{GeneratorConfig, ReportConfig};
pub use error::{DeskError, DeskResult};
pub use generator::{GenerationSummary, InteractionGenerator};
pub use interaction::{Interaction, Resolution, YesNo};
pub use report::OperationsReport;
pub use table::InteractionTable;
