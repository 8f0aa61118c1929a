//! Town Shapes
//! Boundaries triangulated once per session for painting, a lon/lat to
//! screen projection, and point lookup for hover.

use crate::data::TownBoundary;
use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect, TriangulateEarcut};
use std::sync::Arc;

/// One town ready to paint.
pub struct TownShape {
    pub name: String,
    geometry: Arc<MultiPolygon<f64>>,
    /// Fill triangles in lon/lat.
    pub triangles: Vec<[[f64; 2]; 3]>,
    /// Exterior and interior rings in lon/lat, for outlines.
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// All town shapes for one boundary collection.
pub struct TownShapes {
    source: Arc<[TownBoundary]>,
    shapes: Vec<TownShape>,
    bounds: Option<Rect<f64>>,
}

impl TownShapes {
    pub fn build(boundaries: &Arc<[TownBoundary]>) -> Self {
        let shapes: Vec<TownShape> = boundaries
            .iter()
            .map(|boundary| {
                let mut triangles = Vec::new();
                let mut rings = Vec::new();
                for polygon in &boundary.geometry.0 {
                    triangles.extend(polygon.earcut_triangles().into_iter().map(|tri| {
                        let [a, b, c] = tri.to_array();
                        [[a.x, a.y], [b.x, b.y], [c.x, c.y]]
                    }));
                    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
                        rings.push(ring.coords().map(|c| [c.x, c.y]).collect());
                    }
                }
                TownShape {
                    name: boundary.name.clone(),
                    geometry: Arc::clone(&boundary.geometry),
                    triangles,
                    rings,
                }
            })
            .collect();

        let bounds = combined_bounds(boundaries.iter().map(|b| b.geometry.as_ref()));
        log::debug!("Triangulated {} town shapes", shapes.len());

        Self {
            source: Arc::clone(boundaries),
            shapes,
            bounds,
        }
    }

    /// Whether these shapes were built from `boundaries`.
    pub fn is_for(&self, boundaries: &Arc<[TownBoundary]>) -> bool {
        Arc::ptr_eq(&self.source, boundaries)
    }

    pub fn shapes(&self) -> &[TownShape] {
        &self.shapes
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// The town containing a lon/lat point.
    pub fn town_at(&self, lon: f64, lat: f64) -> Option<&TownShape> {
        let point = Point::new(lon, lat);
        self.shapes.iter().find(|shape| {
            shape
                .geometry
                .bounding_rect()
                .is_some_and(|rect| rect_contains(&rect, lon, lat))
                && shape.geometry.contains(&point)
        })
    }
}

fn rect_contains(rect: &Rect<f64>, x: f64, y: f64) -> bool {
    x >= rect.min().x && x <= rect.max().x && y >= rect.min().y && y <= rect.max().y
}

/// Bounding box of a set of multipolygons.
pub fn combined_bounds<'a>(
    geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>,
) -> Option<Rect<f64>> {
    geometries
        .into_iter()
        .filter_map(|g| g.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })
}

/// Equirectangular projection, longitude shrunk by cos(mid latitude), fitted
/// and centered in a `width` x `height` viewport with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    min_lon: f64,
    max_lat: f64,
    lon_scale: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl MapProjection {
    pub fn fit(bounds: Rect<f64>, width: f64, height: f64) -> Self {
        let mid_lat = (bounds.min().y + bounds.max().y) / 2.0;
        let lon_scale = mid_lat.to_radians().cos().abs().max(1e-6);

        let geo_w = (bounds.width() * lon_scale).max(f64::EPSILON);
        let geo_h = bounds.height().max(f64::EPSILON);
        let scale = (width / geo_w).min(height / geo_h);

        Self {
            min_lon: bounds.min().x,
            max_lat: bounds.max().y,
            lon_scale,
            scale,
            offset_x: (width - geo_w * scale) / 2.0,
            offset_y: (height - geo_h * scale) / 2.0,
        }
    }

    pub fn to_screen(&self, lon: f64, lat: f64) -> [f64; 2] {
        [
            self.offset_x + (lon - self.min_lon) * self.lon_scale * self.scale,
            self.offset_y + (self.max_lat - lat) * self.scale,
        ]
    }

    pub fn to_geo(&self, x: f64, y: f64) -> [f64; 2] {
        [
            self.min_lon + (x - self.offset_x) / (self.lon_scale * self.scale),
            self.max_lat - (y - self.offset_y) / self.scale,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(name: &str, x0: f64, y0: f64) -> TownBoundary {
        let p = polygon![
            (x: x0, y: y0),
            (x: x0 + 1.0, y: y0),
            (x: x0 + 1.0, y: y0 + 1.0),
            (x: x0, y: y0 + 1.0),
        ];
        TownBoundary {
            name: name.to_string(),
            geometry: Arc::new(MultiPolygon(vec![p])),
        }
    }

    #[test]
    fn squares_triangulate_into_two_triangles() {
        let boundaries: Arc<[TownBoundary]> = vec![square("A", 0.0, 0.0)].into();
        let shapes = TownShapes::build(&boundaries);
        assert_eq!(shapes.shapes()[0].triangles.len(), 2);
        assert!(shapes.is_for(&boundaries));
    }

    #[test]
    fn hit_test_finds_containing_town() {
        let boundaries: Arc<[TownBoundary]> =
            vec![square("A", 0.0, 0.0), square("B", 1.0, 0.0)].into();
        let shapes = TownShapes::build(&boundaries);
        assert_eq!(shapes.town_at(1.5, 0.5).map(|s| s.name.as_str()), Some("B"));
        assert!(shapes.town_at(5.0, 5.0).is_none());

        let bounds = shapes.bounds().unwrap();
        assert_eq!(bounds.max().x, 2.0);
    }

    #[test]
    fn projection_round_trips() {
        let bounds = Rect::new((-73.7, 41.0), (-71.8, 42.05));
        let projection = MapProjection::fit(bounds, 800.0, 600.0);
        let [x, y] = projection.to_screen(-72.7, 41.6);
        let [lon, lat] = projection.to_geo(x, y);
        assert!((lon + 72.7).abs() < 1e-9);
        assert!((lat - 41.6).abs() < 1e-9);

        // north-west corner maps inside the viewport, north up
        let [nx, ny] = projection.to_screen(-73.7, 42.05);
        assert!(nx >= 0.0 && ny >= 0.0);
        let [_, sy] = projection.to_screen(-73.7, 41.0);
        assert!(sy > ny);
    }
}
