// 距離計算パイプライン専用のカスタムエラー型定義
// 入出力の失敗は全て致命的扱い（リトライなし）

use super::types::PipelineState;
use thiserror::Error;

/// パイプライン全体のエラー型
#[derive(Error, Debug)]
pub enum DistanceError {
    #[error("入力読み込みエラー: {path} - {source}")]
    InputRead {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("入力形式エラー: {path} {line}行目 - {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("出力書き込みエラー: {path} - {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("チャンネルエラー: {message}")]
    Channel { message: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("状態遷移エラー: {from:?} -> {to:?}")]
    StateTransition {
        from: PipelineState,
        to: PipelineState,
    },

    #[error("内部エラー: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl DistanceError {
    /// 入力読み込みエラーの作成
    pub fn input_read(path: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::InputRead {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 入力行の形式エラーの作成
    pub fn malformed_row(path: impl Into<String>, line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// 出力書き込みエラーの作成
    pub fn output_write(path: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// チャンネルエラーの作成
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// 状態遷移エラーの作成
    pub fn state_transition(from: PipelineState, to: PipelineState) -> Self {
        Self::StateTransition { from, to }
    }

    /// 失敗した操作名（致命的エラーの診断出力用）
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InputRead { .. } | Self::MalformedRow { .. } => "load_input",
            Self::OutputWrite { .. } => "write_output",
            Self::Configuration { .. } => "configure",
            Self::Channel { .. } | Self::Task { .. } => "compute_distances",
            Self::StateTransition { .. } => "coordinate",
            Self::Internal { .. } => "internal",
        }
    }

    /// 関連するリソース（ファイルパス）
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::InputRead { path, .. }
            | Self::MalformedRow { path, .. }
            | Self::OutputWrite { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// パイプラインの結果型
pub type PipelineResult<T> = std::result::Result<T, DistanceError>;

impl From<anyhow::Error> for DistanceError {
    fn from(error: anyhow::Error) -> Self {
        DistanceError::Internal { source: error }
    }
}

impl From<tokio::task::JoinError> for DistanceError {
    fn from(error: tokio::task::JoinError) -> Self {
        DistanceError::Task { source: error }
    }
}
