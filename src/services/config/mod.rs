// 設定管理

pub mod implementations;

pub use implementations::{
    validate_config, DefaultPipelineConfig, DEFAULT_BATCH_SIZE, DEFAULT_RESULT_BUFFER_SIZE,
    DEFAULT_WORKER_MULTIPLIER,
};
