// CLI層 - コマンドライン引数の定義と処理

pub mod args;
pub mod commands;

pub use args::*;
pub use commands::*;
