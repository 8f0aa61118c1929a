//! Small in-memory datasets shared by the integration tests.

#![allow(dead_code)]

use ct_housing_dashboard::data::{DataLoader, DataSource, Dataset};

pub const SCORES_CSV: &str = "\
Town,Year,Town Code,County,Affordability Score,IIE Score,Percent Affordable,Number of Returns
Ashford,2011,3,Windham,35.0,0.9,3.3,900
Andover,2011,1,Tolland,40.5,0.8,5.2,100
Andover,2012,1,Tolland,41.0,0.7,5.4,110
Ansonia,2011,2,New Haven,60.0,1.2,20.1,400
Atlantis,2011,999,Nowhere,50.0,1.0,10.0,25
,2011,4,Hartford,10.0,1.0,1.0,10
";

pub const TOWNS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Andover"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
    {"type": "Feature", "properties": {"name": "Ansonia"},
     "geometry": {"type": "Polygon", "coordinates": [[[1,0],[2,0],[2,1],[1,1],[1,0]]]}},
    {"type": "Feature", "properties": {"name": "Ashford"},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[2,0],[3,0],[3,1],[2,1],[2,0]]]]}},
    {"type": "Feature", "properties": {"name": "Avon"},
     "geometry": {"type": "Polygon", "coordinates": [[[3,0],[4,0],[4,1],[3,1],[3,0]]]}},
    {"type": "Feature", "properties": {},
     "geometry": {"type": "Polygon", "coordinates": [[[5,0],[6,0],[6,1],[5,1],[5,0]]]}},
    {"type": "Feature", "properties": {"name": "Lighthouse"},
     "geometry": {"type": "Point", "coordinates": [7.0, 0.5]}}
  ]
}"#;

pub fn csv_source() -> DataSource {
    DataSource::from("fixtures/scores.csv")
}

pub fn geojson_source() -> DataSource {
    DataSource::from("fixtures/towns.geojson")
}

/// Both fixtures parsed the way a real load parses them.
pub fn dataset() -> Dataset {
    let (raw, rows) =
        DataLoader::parse_tabular(SCORES_CSV.as_bytes().to_vec(), &csv_source()).unwrap();
    let boundaries = DataLoader::parse_geometry(TOWNS_GEOJSON.as_bytes(), &geojson_source()).unwrap();
    Dataset {
        raw,
        rows,
        boundaries,
    }
}
