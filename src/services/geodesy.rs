// 大圏距離（haversine）計算

use crate::core::{Coordinate, DistanceUnit};

/// 地球の平均半径（km）
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 1マイルあたりのkm
pub const KM_PER_MILE: f64 = 1.609344;

/// 地球の平均半径（マイル）
pub const EARTH_RADIUS_MI: f64 = EARTH_RADIUS_KM / KM_PER_MILE;

impl DistanceUnit {
    /// 単位に対応する地球半径
    pub fn earth_radius(&self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MI,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// 2地点間の大圏距離を球面近似で計算
///
/// 有効な緯度経度に対しては常に非負の有限値を返す。
pub fn haversine_distance(from: Coordinate, to: Coordinate, unit: DistanceUnit) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // 丸め誤差で1をわずかに超えるとasinがNaNになる
    let c = 2.0 * a.sqrt().min(1.0).asin();

    unit.earth_radius() * c
}
