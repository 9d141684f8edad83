use geo::{Area, LineString, Polygon};
use geos::Geom;

use crate::error::{Error, Result};

/// A single-polygon region record: one closed exterior ring tagged with the
/// EPSG code of its coordinates. Immutable after construction.
///
/// Ring closure is the geometry library's responsibility; validity
/// (degenerate or self-intersecting rings) is checked through GEOS rather
/// than hand-rolled.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    polygon: Polygon<f64>,
    epsg: i32,
}

impl RegionPolygon {
    /// Build a region polygon from an ordered coordinate ring.
    ///
    /// Requires at least three finite coordinate pairs. Zero-area and
    /// self-intersecting rings are rejected with `Error::InvalidGeometry`.
    pub fn new(coordinates: &[(f64, f64)], epsg: i32) -> Result<Self> {
        if coordinates.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "a polygon needs at least 3 coordinates, got {}",
                coordinates.len()
            )));
        }
        if let Some((x, y)) = coordinates
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(Error::InvalidGeometry(format!(
                "non-finite coordinate ({}, {})",
                x, y
            )));
        }

        let polygon = Polygon::new(LineString::from(coordinates.to_vec()), vec![]);

        if polygon.unsigned_area() == 0.0 {
            return Err(Error::InvalidGeometry(
                "degenerate ring with zero area".to_string(),
            ));
        }

        let geos_geom: geos::Geometry = polygon
            .clone()
            .try_into()
            .map_err(|e: geos::Error| Error::InvalidGeometry(e.to_string()))?;
        if !geos_geom.is_valid() {
            let reason = geos_geom
                .is_valid_reason()
                .unwrap_or_else(|_| "ring is degenerate or self-intersecting".to_string());
            return Err(Error::InvalidGeometry(reason));
        }

        Ok(RegionPolygon { polygon, epsg })
    }

    pub fn epsg(&self) -> i32 {
        self.epsg
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Number of exterior ring vertices, including the implicit closure
    /// point added at construction.
    pub fn ring_len(&self) -> usize {
        self.polygon.exterior().0.len()
    }

    /// First exterior ring vertex as (x/longitude, y/latitude). Used as the
    /// anchor when rendering the polygon on a map.
    pub fn first_vertex(&self) -> (f64, f64) {
        let coord = self.polygon.exterior().0[0];
        (coord.x, coord.y)
    }

    /// Well-known-text serialization via GEOS, as consumed by the pipeline
    /// engine's reader stage.
    pub fn to_wkt(&self) -> Result<String> {
        let geos_geom: geos::Geometry = self
            .polygon
            .clone()
            .try_into()
            .map_err(|e: geos::Error| Error::InvalidGeometry(e.to_string()))?;
        let wkt = geos_geom
            .to_wkt()
            .map_err(|e| Error::InvalidGeometry(e.to_string()))?;
        Ok(wkt)
    }

    /// GeoJSON geometry for map rendering.
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.polygon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iowa_ring() -> Vec<(f64, f64)> {
        vec![
            (-93.756155, 41.918015),
            (-93.756155, 41.921429),
            (-93.747334, 41.921429),
            (-93.747334, 41.918015),
        ]
    }

    #[test]
    fn test_valid_ring_keeps_length_and_crs() {
        let region = RegionPolygon::new(&iowa_ring(), 4326).unwrap();
        // 4 input vertices plus the implicit closure point
        assert_eq!(region.ring_len(), 5);
        assert_eq!(region.epsg(), 4326);
    }

    #[test]
    fn test_first_vertex_is_first_input() {
        let region = RegionPolygon::new(&iowa_ring(), 4326).unwrap();
        let (x, y) = region.first_vertex();
        assert_eq!(x, -93.756155);
        assert_eq!(y, 41.918015);
    }

    #[test]
    fn test_too_few_coordinates() {
        let result = RegionPolygon::new(&[(0.0, 0.0), (1.0, 1.0)], 4326);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let result = RegionPolygon::new(&[(0.0, 0.0), (1.0, f64::NAN), (1.0, 0.0)], 4326);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_zero_area_ring() {
        // Collinear ring
        let result = RegionPolygon::new(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)], 4326);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_self_intersecting_ring() {
        // Bowtie
        let result =
            RegionPolygon::new(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)], 4326);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_wkt_is_a_polygon() {
        let region = RegionPolygon::new(&iowa_ring(), 4326).unwrap();
        let wkt = region.to_wkt().unwrap();
        assert!(wkt.starts_with("POLYGON"));
        assert!(wkt.ends_with("))"));
    }

    #[test]
    fn test_geojson_geometry_type() {
        let region = RegionPolygon::new(&iowa_ring(), 4326).unwrap();
        let geometry = region.to_geojson();
        assert!(matches!(geometry.value, geojson::Value::Polygon(_)));
    }
}
