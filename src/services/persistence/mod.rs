// 出力の永続化
// 結果収集、バッチ書き込み、出力先の実装

pub mod implementations;
pub mod sink;

// 公開API
pub use implementations::{encode_rows, CsvDistanceWriter, MemoryDistanceWriter};
pub use sink::spawn_result_sink;
