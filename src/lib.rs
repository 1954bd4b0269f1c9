pub mod boundary;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod meta;
pub mod reporting;
pub mod split;
pub mod store;
pub mod tree;

pub use boundary::{BoundaryExtractor, DEFAULT_RADIUS};
pub use config::{DefaultBatchConfig, DEFAULT_WORKER_COUNT};
pub use crate::core::{
    BatchConfig, BatchReport, EdgeMask, ErrorKind, FileFailure, LabelMap, PrepError, PrepResult,
    ProgressReporter,
};
pub use engine::BatchEdgeMapBuilder;
pub use reporting::{ConsoleProgressReporter, NoOpProgressReporter};
pub use store::{edge_path, LabelImageStore, LocalLabelStore, EDGE_PREFIX};
