// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod consumer;
pub mod distance_engine;
pub mod lifecycle;
mod pipeline;
pub mod producer;

// 公開API - 主要エンジンクラス
pub use api::{compute_distance_file, create_default_engine, create_quiet_engine};
pub use distance_engine::DistanceEngine;
pub use lifecycle::Lifecycle;
pub use pipeline::DistancePipeline;
