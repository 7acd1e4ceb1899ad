// 設定管理の具象実装

use crate::core::{DistanceError, DistanceUnit, PairMode, PipelineConfig, PipelineResult};

/// CPU数に掛けるワーカー数の既定倍率
pub const DEFAULT_WORKER_MULTIPLIER: usize = 4;

/// 1回の書き込みにまとめる既定の行数
pub const DEFAULT_BATCH_SIZE: usize = 2000;

/// 結果チャンネルの既定バッファサイズ
pub const DEFAULT_RESULT_BUFFER_SIZE: usize = 100;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    queue_capacity: Option<usize>,
    result_buffer_size: usize,
    batch_size: usize,
    pair_mode: PairMode,
    distance_unit: DistanceUnit,
    enable_progress: bool,
}

impl DefaultPipelineConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            worker_count: cpu_count.max(1) * DEFAULT_WORKER_MULTIPLIER,
            queue_capacity: None,
            result_buffer_size: DEFAULT_RESULT_BUFFER_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            pair_mode: PairMode::Full,
            distance_unit: DistanceUnit::Miles,
            enable_progress: true,
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// 検出したCPU数に倍率を掛けてワーカー数を決める
    pub fn with_worker_multiplier(mut self, multiplier: usize) -> Self {
        self.worker_count = num_cpus::get().max(1) * multiplier;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn with_result_buffer_size(mut self, buffer_size: usize) -> Self {
        self.result_buffer_size = buffer_size;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_pair_mode(mut self, pair_mode: PairMode) -> Self {
        self.pair_mode = pair_mode;
        self
    }

    pub fn with_distance_unit(mut self, distance_unit: DistanceUnit) -> Self {
        self.distance_unit = distance_unit;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn work_queue_capacity(&self) -> Option<usize> {
        self.queue_capacity
    }

    fn result_buffer_size(&self) -> usize {
        self.result_buffer_size
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn pair_mode(&self) -> PairMode {
        self.pair_mode
    }

    fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}

/// 設定値の検証（tokioのチャンネルは容量0を受け付けない）
pub fn validate_config<C: PipelineConfig + ?Sized>(config: &C) -> PipelineResult<()> {
    if config.worker_count() == 0 {
        return Err(DistanceError::configuration(
            "ワーカー数は1以上である必要があります",
        ));
    }

    if config.batch_size() == 0 {
        return Err(DistanceError::configuration(
            "バッチサイズは1以上である必要があります",
        ));
    }

    if config.result_buffer_size() == 0 {
        return Err(DistanceError::configuration(
            "結果バッファサイズは1以上である必要があります",
        ));
    }

    if config.work_queue_capacity() == Some(0) {
        return Err(DistanceError::configuration(
            "キュー容量は1以上である必要があります",
        ));
    }

    Ok(())
}
