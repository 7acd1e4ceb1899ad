// Worker - 単一の起点に対する距離計算

use crate::core::{DistanceResult, DistanceUnit, PairMode, Point, PointTable, WorkItem};
use crate::services::geodesy::haversine_distance;
use tokio::sync::mpsc;

/// 起点に対する宛先の列（テーブル順）
///
/// 全行列モードでは自分自身を含む全地点、半行列モードでは起点より後ろの地点のみ。
pub fn destinations<'a>(source: &WorkItem, table: &'a PointTable, mode: PairMode) -> &'a [Point] {
    let points = table.points();
    match mode {
        PairMode::Full => points,
        PairMode::HalfMatrix => points.get(source.position + 1..).unwrap_or(&[]),
    }
}

/// 1ペア分の距離計算
pub fn measure(source: &Point, dest: &Point, unit: DistanceUnit) -> DistanceResult {
    DistanceResult {
        source_label: source.label.clone(),
        dest_label: dest.label.clone(),
        distance: haversine_distance(source.coordinate, dest.coordinate, unit),
    }
}

/// 起点から各宛先への距離を計算して結果チャンネルへ送る
///
/// 送信数を返す。結果チャンネルが閉じられていた場合は`None`。
pub async fn process_source(
    source: &WorkItem,
    table: &PointTable,
    unit: DistanceUnit,
    mode: PairMode,
    result_tx: &mpsc::Sender<DistanceResult>,
) -> Option<usize> {
    let mut sent = 0;
    for dest in destinations(source, table, mode) {
        let result = measure(&source.point, dest, unit);
        if result_tx.send(result).await.is_err() {
            return None;
        }
        sent += 1;
    }
    Some(sent)
}
