mod common;

use ct_housing_dashboard::data::{DataLoader, DataSource, Joiner, LoaderError};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn parses_score_columns_by_header() {
    let dataset = common::dataset();
    assert_eq!(dataset.raw.height(), 6);

    let ansonia = dataset.rows.iter().find(|r| r.town == "Ansonia").unwrap();
    assert_eq!(ansonia.year, 2011);
    assert_eq!(ansonia.town_code, Some(2));
    assert_eq!(ansonia.county.as_deref(), Some("New Haven"));
    assert_eq!(ansonia.affordability_score, Some(60.0));
    assert_eq!(ansonia.inequality_score, Some(1.2));
    assert_eq!(ansonia.percent_affordable, Some(20.1));
    assert_eq!(ansonia.number_of_returns, Some(400));

    // the row without a town is not a record
    assert!(dataset.rows.iter().all(|r| !r.town.is_empty()));
    assert_eq!(dataset.rows.len(), 5);
}

#[test]
fn blank_cells_become_missing_values() {
    let csv = "\
Town,Year,Town Code,County,Affordability Score,IIE Score,Percent Affordable,Number of Returns
Bethany,2014,8,New Haven,,0.5,,
";
    let (_, rows) =
        DataLoader::parse_tabular(csv.as_bytes().to_vec(), &common::csv_source()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].affordability_score, None);
    assert_eq!(rows[0].inequality_score, Some(0.5));
    assert_eq!(rows[0].number_of_returns, None);
}

#[test]
fn town_names_are_kept_as_written() {
    let csv = "\
Town,Year,Town Code,County,Affordability Score,IIE Score,Percent Affordable,Number of Returns
\" Avon \",2011,4, Hartford ,50.0,0.4,10.0,1000
Bristol,2011,17,Hartford,45.0,0.5,8.0,2000
";
    let geojson = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Avon"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    {"type": "Feature", "properties": {"name": "Bristol "},
     "geometry": {"type": "Polygon", "coordinates": [[[1,0],[2,0],[2,1],[1,1],[1,0]]]}}
  ]
}"#;

    let (_, rows) =
        DataLoader::parse_tabular(csv.as_bytes().to_vec(), &common::csv_source()).unwrap();
    assert_eq!(rows[0].town, " Avon ");
    let boundaries =
        DataLoader::parse_geometry(geojson.as_bytes(), &common::geojson_source()).unwrap();
    assert_eq!(boundaries[1].name, "Bristol ");

    let joined = Joiner::join(&boundaries, &rows);
    assert_eq!(
        joined.towns_without_geometry(),
        vec![" Avon ".to_string(), "Bristol".to_string()]
    );
    assert_eq!(
        joined.towns_without_data(),
        vec!["Avon".to_string(), "Bristol ".to_string()]
    );
}

#[test]
fn missing_column_makes_source_unavailable() {
    let csv = "Town,Year,County\nAndover,2011,Tolland\n";
    let err = DataLoader::parse_tabular(csv.as_bytes().to_vec(), &common::csv_source())
        .unwrap_err();
    assert!(matches!(err, LoaderError::SourceUnavailable { .. }));
    assert!(err.to_string().contains("fixtures/scores.csv"));
}

#[test]
fn geometry_skips_unnamed_and_non_areal_features() {
    let boundaries =
        DataLoader::parse_geometry(common::TOWNS_GEOJSON.as_bytes(), &common::geojson_source())
            .unwrap();
    let names: Vec<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Andover", "Ansonia", "Ashford", "Avon"]);
    assert!(boundaries.iter().all(|b| b.geometry.0.len() == 1));
}

#[test]
fn bare_geometry_is_not_a_boundary_source() {
    let geometry = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
    let err = DataLoader::parse_geometry(geometry.as_bytes(), &common::geojson_source())
        .unwrap_err();
    assert!(matches!(err, LoaderError::SourceUnavailable { .. }));

    let err = DataLoader::parse_geometry(b"not json", &common::geojson_source()).unwrap_err();
    assert!(matches!(err, LoaderError::SourceUnavailable { .. }));
}

#[test]
fn loads_both_sources_from_local_files() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("scores.csv");
    let geo_path = dir.path().join("towns.geojson");
    fs::write(&csv_path, common::SCORES_CSV).unwrap();
    fs::write(&geo_path, common::TOWNS_GEOJSON).unwrap();

    let loader = DataLoader::new(Duration::from_secs(5)).unwrap();
    let dataset = loader
        .load(
            &DataSource::File(csv_path),
            &DataSource::File(geo_path),
        )
        .unwrap();
    assert_eq!(dataset.rows.len(), 5);
    assert_eq!(dataset.boundaries.len(), 4);
}

#[test]
fn missing_file_fails_the_whole_load() {
    let dir = TempDir::new().unwrap();
    let geo_path = dir.path().join("towns.geojson");
    fs::write(&geo_path, common::TOWNS_GEOJSON).unwrap();

    let loader = DataLoader::new(Duration::from_secs(5)).unwrap();
    let result = loader.load(
        &DataSource::File(dir.path().join("missing.csv")),
        &DataSource::File(geo_path),
    );
    assert!(matches!(result, Err(LoaderError::SourceUnavailable { .. })));
}
