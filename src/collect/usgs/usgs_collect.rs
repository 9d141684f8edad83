use std::path::PathBuf;

use url::Url;

use crate::collect::global_variables::USGS_LIDAR_URL;
use crate::collect::usgs::ept::EptMetadata;
use crate::collect::usgs::pipeline::{
    find_template_file, PipelineEngine, PipelineRequest, PipelineTemplate,
};
use crate::error::{Error, Result};
use crate::geo_core::{WEB_MERCATOR, WGS84};
use crate::geometric::{PointTable, RegionPolygon};

/// Client for the public USGS 3DEP LiDAR datasets on AWS.
///
/// Caches the region polygon and endpoint configuration at construction;
/// both are read-only afterwards. Each fetch builds a fresh request from the
/// template, hands it to the execution engine, and loads the result into a
/// `PointTable`. A failed fetch never corrupts the cached configuration, so
/// the same collector can be retried by the caller.
pub struct UsgsCollect {
    /// Base URL of the tile bucket.
    url: String,
    /// Dataset name, e.g. "IA_FullState".
    region: String,
    /// CRS the bucket stores tiles in.
    in_epsg: i32,
    /// CRS requested for the output rows.
    out_epsg: i32,
    /// Section of the region to fetch, cached at construction.
    polygon: RegionPolygon,
    /// Explicit template document path; the bundled template when None.
    template_path: Option<PathBuf>,
}

impl UsgsCollect {
    /// Create a collector for a section of a named region.
    ///
    /// `coordinates` outline the section in EPSG:4326 (lon, lat) order; the
    /// polygon is validated and cached here. Defaults: public USGS bucket,
    /// tiles stored in EPSG:3857, output in EPSG:4326.
    pub fn new(coordinates: &[(f64, f64)], region: impl Into<String>) -> Result<Self> {
        let polygon = RegionPolygon::new(coordinates, WGS84)?;

        Ok(UsgsCollect {
            url: USGS_LIDAR_URL.to_string(),
            region: region.into(),
            in_epsg: WEB_MERCATOR,
            out_epsg: WGS84,
            polygon,
            template_path: None,
        })
    }

    /// Point the collector at a different tile bucket.
    pub fn with_endpoint(mut self, url: &str) -> Result<Self> {
        Url::parse(url).map_err(|source| Error::InvalidEndpoint {
            url: url.to_string(),
            source,
        })?;
        self.url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Override the storage/output CRS pair.
    pub fn with_crs(mut self, in_epsg: i32, out_epsg: i32) -> Self {
        self.in_epsg = in_epsg;
        self.out_epsg = out_epsg;
        self
    }

    /// Use a template document other than the bundled one.
    pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn in_epsg(&self) -> i32 {
        self.in_epsg
    }

    pub fn out_epsg(&self) -> i32 {
        self.out_epsg
    }

    pub fn polygon(&self) -> &RegionPolygon {
        &self.polygon
    }

    /// The template document is read once per request build.
    fn template(&self) -> Result<PipelineTemplate> {
        let path = match &self.template_path {
            Some(path) => path.clone(),
            None => find_template_file()?,
        };
        PipelineTemplate::from_file(&path)
    }

    /// Build a fully parameterized request for this collector's polygon,
    /// region and CRS pair.
    pub fn build_request(&self) -> Result<PipelineRequest> {
        let template = self.template()?;
        template.build_request(
            &self.url,
            &self.region,
            self.in_epsg,
            self.out_epsg,
            &self.polygon,
        )
    }

    /// Fetch the points inside the cached polygon.
    ///
    /// One blocking engine call. Engine failures surface as
    /// `Error::EngineExecution`; zero output rows surface as
    /// `Error::EmptyResult`, which callers may treat as "no points fetched".
    /// The returned table is tagged with the output CRS.
    pub fn fetch<E: PipelineEngine>(&self, engine: &E) -> Result<PointTable> {
        let request = self.build_request()?;

        let rows = engine
            .execute(&request)
            .map_err(Error::EngineExecution)?;

        if rows.is_empty() {
            return Err(Error::EmptyResult);
        }

        PointTable::from_rows(&rows, self.out_epsg)
    }

    /// Probe the remote dataset's `ept.json` for bounds, point count and
    /// storage CRS without fetching any tile data.
    pub fn ept_metadata(&self) -> Result<EptMetadata> {
        EptMetadata::fetch(&self.url, &self.region)
    }
}
