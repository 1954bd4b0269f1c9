// コアモジュール - 型・エラー・トレイト定義

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, PrepError, PrepResult};
pub use traits::{BatchConfig, ProgressReporter};
pub use types::{BatchReport, EdgeMask, FileFailure, FileOutcome, LabelMap};
