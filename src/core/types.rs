// 距離計算に関連するデータ型定義

use serde::Serialize;
use std::sync::Arc;

/// 緯度経度（度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// 緯度経度が有効範囲内かどうか
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// ラベル付きの地点（郵便番号など）
///
/// ラベルは`Arc<str>`で保持し、N²個の結果へ安価に複製できるようにする。
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub label: Arc<str>,
    pub coordinate: Coordinate,
}

impl Point {
    pub fn new(label: impl Into<Arc<str>>, latitude: f64, longitude: f64) -> Self {
        Self {
            label: label.into(),
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

/// 読み込み済みの地点テーブル
///
/// 構築後は不変。全ワーカーから`Arc<PointTable>`で同期なしに参照される。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointTable {
    points: Vec<Point>,
}

impl PointTable {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl FromIterator<Point> for PointTable {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// WorkQueueを流れる作業単位
///
/// `position`はテーブル内の位置で、半行列モードで宛先の開始位置を決めるのに使う。
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub position: usize,
    pub point: Point,
}

/// ワーカーが生成する1ペア分の計算結果
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceResult {
    pub source_label: Arc<str>,
    pub dest_label: Arc<str>,
    pub distance: f64,
}

impl DistanceResult {
    /// 自分自身とのペアかどうか
    pub fn is_self_pair(&self) -> bool {
        self.source_label == self.dest_label
    }
}

/// 出力1行（距離は小数点以下3桁に整形済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistanceRow {
    pub source: String,
    pub destination: String,
    pub distance: String,
}

/// 出力時の小数点以下の桁数
pub const DISTANCE_PRECISION: usize = 3;

impl From<&DistanceResult> for DistanceRow {
    fn from(result: &DistanceResult) -> Self {
        Self {
            source: result.source_label.to_string(),
            destination: result.dest_label.to_string(),
            distance: format!("{:.*}", DISTANCE_PRECISION, result.distance),
        }
    }
}

/// 距離の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

/// 出力するペアの範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PairMode {
    /// (A,B)と(B,A)の両方を出力する
    #[default]
    Full,
    /// テーブル順で後ろにある宛先のみ出力する
    #[value(name = "half")]
    HalfMatrix,
}

impl PairMode {
    /// 自己ペアを除いた出力行数の期待値
    pub fn expected_rows(&self, point_count: usize) -> usize {
        let full = point_count * point_count.saturating_sub(1);
        match self {
            Self::Full => full,
            Self::HalfMatrix => full / 2,
        }
    }
}

/// Coordinatorの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    Loading,
    Dispatching,
    Draining,
    Flushing,
    Done,
    Aborted,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// ワーカー1つ分の完了報告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub sources_processed: usize,
    pub pairs_computed: usize,
}

/// ResultSinkの完了報告
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkReport {
    pub rows_written: usize,
    pub batches_flushed: usize,
    pub self_pairs_dropped: usize,
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub point_count: usize,
    pub worker_count: usize,
    pub pairs_computed: usize,
    pub rows_written: usize,
    pub self_pairs_dropped: usize,
    pub batches_flushed: usize,
    pub elapsed_ms: u64,
}
