// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;

// 公開API
pub use error::{DistanceError, PipelineResult};
pub use traits::{DistanceWriter, PipelineConfig, ProgressReporter};
pub use types::{
    Coordinate, DistanceResult, DistanceRow, DistanceUnit, PairMode, PipelineState, Point,
    PointTable, RunSummary, SinkReport, WorkItem, WorkerReport, DISTANCE_PRECISION,
};
