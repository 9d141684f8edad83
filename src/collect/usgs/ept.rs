use serde::Deserialize;
use std::time::Duration;

use crate::error::Result;

/// Spatial reference block of an EPT metadata document.
#[derive(Debug, Clone, Deserialize)]
pub struct EptSrs {
    pub authority: Option<String>,
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wkt: Option<String>,
}

/// Summary of a remote Entwine Point Tile dataset, parsed from
/// `{url}/{region}/ept.json`.
///
/// Lets callers confirm a region exists and inspect its extent and size
/// before committing to a full (and potentially slow) pipeline run. Only
/// the metadata document is transferred; tile data stays with the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EptMetadata {
    /// Cubic bounds as (min_x, min_y, min_z, max_x, max_y, max_z) in the
    /// dataset's storage CRS.
    pub bounds: [f64; 6],
    /// Total number of points in the dataset.
    pub points: u64,
    /// Voxel span of the octree root.
    pub span: u32,
    pub data_type: Option<String>,
    pub srs: Option<EptSrs>,
    pub version: Option<String>,
}

impl EptMetadata {
    /// One blocking GET of the region's `ept.json`. Non-2xx responses and
    /// undecodable bodies surface as `Error::MetadataFetch`.
    pub fn fetch(url: &str, region: &str) -> Result<Self> {
        let endpoint = format!("{}/{}/ept.json", url, region);

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let response = client.get(&endpoint).send()?.error_for_status()?;
        let metadata = response.json::<EptMetadata>()?;
        Ok(metadata)
    }

    /// Horizontal EPSG code of the storage CRS, when the document names one.
    pub fn horizontal_epsg(&self) -> Option<i32> {
        self.srs.as_ref()?.horizontal.as_ref()?.parse().ok()
    }
}
