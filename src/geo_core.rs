use geo::Point;
use proj::Proj;

use crate::error::{Error, Result};

/// EPSG code of the web-mercator CRS the public 3DEP bucket stores tiles in.
pub const WEB_MERCATOR: i32 = 3857;

/// EPSG code of the geographic (lon/lat) CRS used for polygons and output.
pub const WGS84: i32 = 4326;

/// Base struct for geospatial operations.
/// Holds the EPSG code tagged onto polygons and tables; individual
/// coordinate pairs never carry their CRS in memory, so everything that
/// aggregates them does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoCore {
    pub epsg: i32,
}

impl GeoCore {
    pub fn new(epsg: i32) -> Self {
        GeoCore { epsg }
    }

    /// The `EPSG:<code>` string understood by proj and the pipeline engine.
    pub fn srs(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// Transform coordinates from one CRS to another.
    pub fn transform_coords(from_epsg: i32, to_epsg: i32, x: f64, y: f64) -> Result<(f64, f64)> {
        let from_crs = format!("EPSG:{}", from_epsg);
        let to_crs = format!("EPSG:{}", to_epsg);

        let proj = Proj::new_known_crs(&from_crs, &to_crs, None)?;
        let result = proj.convert((x, y))?;

        Ok(result)
    }

    /// Transform a Point from one CRS to another.
    pub fn transform_point(from_epsg: i32, to_epsg: i32, point: Point<f64>) -> Result<Point<f64>> {
        let (x, y) = Self::transform_coords(from_epsg, to_epsg, point.x(), point.y())?;
        Ok(Point::new(x, y))
    }
}

impl Default for GeoCore {
    fn default() -> Self {
        GeoCore::new(WGS84)
    }
}

/// Convert a single (lon, lat) pair between the fixed pair
/// {EPSG:3857, EPSG:4326}; the destination is the other member.
///
/// Both directions are constructed up front and one is selected by an
/// explicit match on `from_epsg`. Codes outside the pair are rejected with
/// `Error::UnsupportedCrs`.
pub fn convert_epsg(lon: f64, lat: f64, from_epsg: i32) -> Result<(f64, f64)> {
    let geographic_to_mercator = Proj::new_known_crs("EPSG:4326", "EPSG:3857", None)?;
    let mercator_to_geographic = Proj::new_known_crs("EPSG:3857", "EPSG:4326", None)?;

    let transformer = match from_epsg {
        WGS84 => geographic_to_mercator,
        WEB_MERCATOR => mercator_to_geographic,
        other => return Err(Error::UnsupportedCrs(other)),
    };

    let (x, y) = transformer.convert((lon, lat))?;
    Ok((x, y))
}

/// Convert a list of coordinate pairs between the fixed pair
/// {EPSG:3857, EPSG:4326}. Pure function of its inputs; the transformer is
/// built once and applied to every pair in order.
pub fn convert_coordinate_list(
    coordinates: &[(f64, f64)],
    from_epsg: i32,
) -> Result<Vec<(f64, f64)>> {
    let to_epsg = match from_epsg {
        WGS84 => WEB_MERCATOR,
        WEB_MERCATOR => WGS84,
        other => return Err(Error::UnsupportedCrs(other)),
    };

    let transformer = Proj::new_known_crs(
        &format!("EPSG:{}", from_epsg),
        &format!("EPSG:{}", to_epsg),
        None,
    )?;

    let mut converted = Vec::with_capacity(coordinates.len());
    for &(lon, lat) in coordinates {
        let pair = transformer.convert((lon, lat))?;
        converted.push(pair);
    }

    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geo_core_default() {
        let gc = GeoCore::default();
        assert_eq!(gc.epsg, WGS84);
        assert_eq!(gc.srs(), "EPSG:4326");
    }

    #[test]
    fn test_convert_epsg_rejects_unknown_code() {
        let result = convert_epsg(2.0, 48.0, 2154);
        assert!(matches!(result, Err(Error::UnsupportedCrs(2154))));
    }

    #[test]
    fn test_convert_coordinate_list_rejects_unknown_code() {
        let result = convert_coordinate_list(&[(2.0, 48.0)], 9999);
        assert!(matches!(result, Err(Error::UnsupportedCrs(9999))));
    }

    #[test]
    fn test_convert_epsg_round_trip() {
        // Round-trip may only run if proj data is available
        let forward = convert_epsg(-93.75, 41.92, 4326);
        if let Ok((x, y)) = forward {
            let (lon, lat) = convert_epsg(x, y, 3857).unwrap();
            assert_relative_eq!(lon, -93.75, epsilon = 1e-6);
            assert_relative_eq!(lat, 41.92, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_convert_coordinate_list_matches_single_conversion() {
        let coords = [(-93.75, 41.92), (-93.76, 41.93)];
        let list = convert_coordinate_list(&coords, 4326);
        if let Ok(list) = list {
            assert_eq!(list.len(), 2);
            for (pair, &(lon, lat)) in list.iter().zip(coords.iter()) {
                let single = convert_epsg(lon, lat, 4326).unwrap();
                assert_relative_eq!(pair.0, single.0, epsilon = 1e-9);
                assert_relative_eq!(pair.1, single.1, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_transform_coords() {
        // This test may fail if proj data is not installed
        let result = GeoCore::transform_coords(4326, 3857, -93.75, 41.92);
        if result.is_ok() {
            let (x, y) = result.unwrap();
            assert!(x.is_finite());
            assert!(y.is_finite());
        }
    }
}
