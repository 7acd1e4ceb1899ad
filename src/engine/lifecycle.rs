// Lifecycle - Coordinatorの状態遷移
// Init → Loading → Dispatching → Draining → Flushing → Done
// どの状態からもAbortedへ遷移できる

use crate::core::{DistanceError, PipelineResult, PipelineState};
use std::sync::Mutex;

#[derive(Debug)]
pub struct Lifecycle {
    state: Mutex<PipelineState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PipelineState::Init),
        }
    }

    /// 現在の状態
    pub fn state(&self) -> PipelineState {
        *self.lock()
    }

    /// 次の状態へ進む（順序外の遷移はエラー）
    pub fn advance(&self, to: PipelineState) -> PipelineResult<()> {
        let mut state = self.lock();
        if !is_allowed(*state, to) {
            return Err(DistanceError::state_transition(*state, to));
        }
        log::debug!("pipeline: {:?} -> {:?}", *state, to);
        *state = to;
        Ok(())
    }

    /// 回復不能なエラーでAbortedへ遷移（終了済みの場合は何もしない）
    pub fn abort(&self) {
        let mut state = self.lock();
        if !state.is_terminal() {
            log::debug!("pipeline: {:?} -> Aborted", *state);
            *state = PipelineState::Aborted;
        }
    }

    /// 次の実行のためにInitへ戻す
    pub fn reset(&self) {
        *self.lock() = PipelineState::Init;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PipelineState> {
        // ガード保持中は値のコピーのみ
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn is_allowed(from: PipelineState, to: PipelineState) -> bool {
    use crate::core::PipelineState::*;
    matches!(
        (from, to),
        (Init, Loading)
            | (Loading, Dispatching)
            | (Dispatching, Draining)
            | (Draining, Flushing)
            | (Flushing, Done)
    ) || (to == Aborted && !from.is_terminal())
}
