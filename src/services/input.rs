// 入力CSVから地点テーブルを構築する
// 形式: ヘッダー行 + `label,latitude,longitude[,...]`

use crate::core::{DistanceError, PipelineResult, Point, PointTable};
use std::io::Read;
use std::path::Path;

/// ファイルパスから地点テーブルを読み込む
pub fn load_point_table(path: &Path) -> PipelineResult<PointTable> {
    let source_name = path.display().to_string();
    let file =
        std::fs::File::open(path).map_err(|e| DistanceError::input_read(&source_name, e))?;

    let table = parse_point_table(file, &source_name)?;
    log::debug!("{} 地点を読み込みました: {source_name}", table.len());
    Ok(table)
}

/// 任意のリーダーから地点テーブルを構築
pub fn parse_point_table<R: Read>(reader: R, source_name: &str) -> PipelineResult<PointTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut points = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| DistanceError::input_read(source_name, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        points.push(parse_point(&record, source_name, line)?);
    }

    Ok(PointTable::new(points))
}

fn parse_point(record: &csv::StringRecord, source_name: &str, line: u64) -> PipelineResult<Point> {
    if record.len() < 3 {
        return Err(DistanceError::malformed_row(
            source_name,
            line,
            format!("3列以上が必要です（{}列）", record.len()),
        ));
    }

    let label = &record[0];
    let latitude = parse_degrees(&record[1], "緯度", source_name, line)?;
    let longitude = parse_degrees(&record[2], "経度", source_name, line)?;

    let point = Point::new(label, latitude, longitude);
    if !point.coordinate.is_valid() {
        return Err(DistanceError::malformed_row(
            source_name,
            line,
            format!("座標が範囲外です: ({latitude}, {longitude})"),
        ));
    }

    Ok(point)
}

fn parse_degrees(field: &str, name: &str, source_name: &str, line: u64) -> PipelineResult<f64> {
    field.parse::<f64>().map_err(|e| {
        DistanceError::malformed_row(
            source_name,
            line,
            format!("{name}を解析できません '{field}': {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_discards_header() {
        let csv = "zip,lat,lon\n10001,40.7506,-73.9972\n90210,34.1030,-118.4105\n";
        let table = parse_point_table(csv.as_bytes(), "inline").unwrap();

        assert_eq!(table.len(), 2);
        let first = table.get(0).unwrap();
        assert_eq!(&*first.label, "10001");
        assert_eq!(first.coordinate.latitude, 40.7506);
        assert_eq!(first.coordinate.longitude, -73.9972);
    }

    #[test]
    fn test_parse_ignores_extra_columns_and_whitespace() {
        let csv = "zip,lat,lon,city\n 10001 , 40.75 , -73.99 ,New York\n";
        let table = parse_point_table(csv.as_bytes(), "inline").unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(&*table.get(0).unwrap().label, "10001");
        assert_eq!(table.get(0).unwrap().coordinate.longitude, -73.99);
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_point_table("zip,lat,lon\n".as_bytes(), "inline").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_coordinate_column() {
        let csv = "zip,lat,lon\n10001,40.75,-73.99\n10002,40.71\n";
        let error = parse_point_table(csv.as_bytes(), "inline").unwrap_err();

        match &error {
            DistanceError::MalformedRow { line, reason, .. } => {
                assert_eq!(*line, 3);
                assert!(reason.contains("3列以上"));
            }
            other => panic!("MalformedRowが期待されます: {other:?}"),
        }
        assert_eq!(error.operation(), "load_input");
    }

    #[test]
    fn test_unparsable_latitude() {
        let csv = "zip,lat,lon\n10001,north,-73.99\n";
        let error = parse_point_table(csv.as_bytes(), "inline").unwrap_err();

        assert!(matches!(error, DistanceError::MalformedRow { line: 2, .. }));
        assert!(error.to_string().contains("north"));
    }

    #[test]
    fn test_out_of_range_coordinate() {
        let csv = "zip,lat,lon\n10001,95.0,-73.99\n";
        let error = parse_point_table(csv.as_bytes(), "inline").unwrap_err();

        assert!(matches!(error, DistanceError::MalformedRow { .. }));
        assert!(error.to_string().contains("範囲外"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "zip,lat,lon").unwrap();
        writeln!(file, "A,0.0,0.0").unwrap();
        writeln!(file, "B,0.0,1.0").unwrap();
        file.flush().unwrap();

        let table = load_point_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let error = load_point_table(Path::new("/nonexistent/zips.csv")).unwrap_err();

        assert!(matches!(error, DistanceError::InputRead { .. }));
        assert_eq!(error.resource(), Some("/nonexistent/zips.csv"));
    }
}
