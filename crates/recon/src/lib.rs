//! `uidmatch-recon` — identifier reconciliation and column merge engine.
//!
//! Pure engine crate: receives input files, returns structured results and
//! rendered reports. No CLI dependencies and no printing; persistence sits
//! behind the [`store::ReportStore`] trait.

pub mod config;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod violations;

pub use config::EngineConfig;
pub use dataset::{load_dataset, SourceDataset};
pub use error::ReconError;
pub use merge::{merge, MergeMode, MergeRequest, MergeResult, MergedColumn};
pub use model::{FileWarning, Outcome, WarningKind};
pub use normalize::normalize;
pub use reconcile::{compare, reconcile, ReconciliationResult};
pub use report::Language;
pub use violations::{aggregate, aggregate_file, ViolationRecord, ViolationReport};
