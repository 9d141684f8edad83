use geo::Point;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};

use crate::error::{Error, Result};

#[cfg(feature = "polars")]
use polars::prelude::*;

/// Tabular view of a point-cloud fetch: parallel elevation and point
/// geometry columns with a single CRS tag for the whole table.
///
/// Row order matches the raw engine output exactly; nothing is reordered or
/// deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    elevations: Vec<f64>,
    geometry: Vec<Point<f64>>,
    epsg: i32,
}

impl PointTable {
    /// Assemble a table from raw engine output rows.
    ///
    /// The last three numeric fields of each row are taken in order as
    /// (x, y, elevation). Rows with fewer than three fields are rejected
    /// with `Error::MalformedRow`. An empty row sequence yields an empty
    /// table tagged with `epsg`.
    pub fn from_rows(rows: &[Vec<f64>], epsg: i32) -> Result<Self> {
        let mut elevations = Vec::with_capacity(rows.len());
        let mut geometry = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            if row.len() < 3 {
                return Err(Error::MalformedRow {
                    index,
                    len: row.len(),
                });
            }
            let tail = &row[row.len() - 3..];
            geometry.push(Point::new(tail[0], tail[1]));
            elevations.push(tail[2]);
        }

        Ok(PointTable {
            elevations,
            geometry,
            epsg,
        })
    }

    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    pub fn epsg(&self) -> i32 {
        self.epsg
    }

    pub fn elevations(&self) -> &[f64] {
        &self.elevations
    }

    pub fn geometry(&self) -> &[Point<f64>] {
        &self.geometry
    }

    /// Iterate rows as (point, elevation) pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&Point<f64>, f64)> {
        self.geometry.iter().zip(self.elevations.iter().copied())
    }

    /// (min, max) of the elevation column, or None for an empty table.
    pub fn elevation_range(&self) -> Option<(f64, f64)> {
        let first = *self.elevations.first()?;
        let range = self
            .elevations
            .iter()
            .fold((first, first), |(lo, hi), &z| (lo.min(z), hi.max(z)));
        Some(range)
    }

    /// Export as a GeoJSON feature collection, one point feature per row
    /// with its elevation as a property.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .iter()
            .map(|(point, elevation)| {
                let mut properties = JsonObject::new();
                properties.insert("elevation".to_string(), serde_json::json!(elevation));
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(point))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Export as a polars DataFrame with x, y and elevation columns.
    #[cfg(feature = "polars")]
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let xs: Vec<f64> = self.geometry.iter().map(|p| p.x()).collect();
        let ys: Vec<f64> = self.geometry.iter().map(|p| p.y()).collect();
        let frame = df!(
            "x" => xs,
            "y" => ys,
            "elevation" => self.elevations.clone(),
        )?;
        Ok(frame)
    }
}
