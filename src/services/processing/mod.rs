// 距離計算処理

pub mod worker;

pub use worker::{destinations, measure, process_source};
