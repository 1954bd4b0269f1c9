// バッチ実行エンジン

mod builder;
mod pipeline;

pub use builder::BatchEdgeMapBuilder;
