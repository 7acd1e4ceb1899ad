// 進捗監視

pub mod implementations;

pub use implementations::{ConsoleProgressReporter, NoOpProgressReporter};
