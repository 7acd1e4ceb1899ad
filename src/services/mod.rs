// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod geodesy;
pub mod input;
pub mod monitoring;
pub mod persistence;
pub mod processing;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{validate_config, DefaultPipelineConfig};
pub use geodesy::haversine_distance;
pub use input::{load_point_table, parse_point_table};
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use persistence::{spawn_result_sink, CsvDistanceWriter, MemoryDistanceWriter};
pub use processing::process_source;
