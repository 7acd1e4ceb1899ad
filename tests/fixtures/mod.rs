// 統合テスト用のヘルパー
#![allow(dead_code)]

use pair_distance::core::{Point, PointTable};
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "zip,latitude,longitude";

/// ヘッダー付きの入力CSVを書き込む
pub fn write_points_csv(dir: &Path, name: &str, points: &[(&str, f64, f64)]) -> PathBuf {
    let mut content = format!("{HEADER}\n");
    for (label, latitude, longitude) in points {
        content.push_str(&format!("{label},{latitude},{longitude}\n"));
    }
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// 任意の内容の入力ファイルを書き込む
pub fn write_raw(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// `side` x `side` の格子状の地点（ラベルは連番）
pub fn grid_points(side: usize) -> Vec<Point> {
    (0..side * side)
        .map(|i| {
            let latitude = 30.0 + (i / side) as f64 * 0.25;
            let longitude = -120.0 + (i % side) as f64 * 0.25;
            Point::new(format!("{:05}", i), latitude, longitude)
        })
        .collect()
}

pub fn grid_table(side: usize) -> PointTable {
    PointTable::new(grid_points(side))
}

/// 出力CSVを (source, destination, distance) の行に分解する
pub fn read_rows(path: &Path) -> Vec<(String, String, String)> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), 3, "3列であるべきです: {line}");
            (
                fields[0].to_string(),
                fields[1].to_string(),
                fields[2].to_string(),
            )
        })
        .collect()
}

pub fn sorted(mut rows: Vec<(String, String, String)>) -> Vec<(String, String, String)> {
    rows.sort();
    rows
}
