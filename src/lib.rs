//! 地点テーブルの全ペア間の大圏距離を並列に計算し、CSVへ書き出す。
//!
//! - `core`: 型・トレイト・エラー
//! - `services`: 入力、距離計算、設定、進捗報告、出力
//! - `engine`: キュー・ワーカー・結果シンクの組み立てとライフサイクル
//! - `cli`: コマンドライン引数とコマンド

pub mod cli;
pub mod core;
pub mod engine;
pub mod services;
