use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collect::global_variables::PIPELINE_TEMPLATE_NAME;
use crate::error::{Error, Result};
use crate::geo_core::GeoCore;
use crate::geometric::RegionPolygon;

/// One pipeline stage as the engine sees it: a JSON object of stage fields.
pub type Stage = Map<String, Value>;

/// Boundary to the external point-cloud execution engine.
///
/// The engine accepts a parameterized request, performs the (blocking)
/// network fetch and decode, and returns raw output rows. The last three
/// fields of each row are (x, y, elevation) in the request's output CRS.
/// Engine-defined failures are surfaced by callers as
/// `Error::EngineExecution`.
pub trait PipelineEngine {
    fn execute(
        &self,
        request: &PipelineRequest,
    ) -> std::result::Result<Vec<Vec<f64>>, Box<dyn std::error::Error + Send + Sync>>;
}

/// An unparameterized pipeline document: an ordered list of stage
/// descriptors with a reader stage first and a reprojection stage third.
///
/// Loaded once per request build; `build_request` deep-copies it, so a
/// template can parameterize any number of requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineTemplate {
    pipeline: Vec<Stage>,
}

impl PipelineTemplate {
    /// Load and validate a template document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::TemplateNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a template from its JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let template: PipelineTemplate =
            serde_json::from_str(raw).map_err(|e| Error::MalformedTemplate(e.to_string()))?;
        template.validate()?;
        Ok(template)
    }

    /// Reject templates whose stage shape does not match what
    /// `build_request` parameterizes: at least three stages, a reader stage
    /// first (takes `polygon`/`filename`) and a reprojection stage third
    /// (takes `in_srs`/`out_srs`).
    fn validate(&self) -> Result<()> {
        if self.pipeline.len() < 3 {
            return Err(Error::MalformedTemplate(format!(
                "expected at least 3 stages, found {}",
                self.pipeline.len()
            )));
        }

        let reader_type = self.stage_type(0);
        if !reader_type.map_or(false, |t| t.starts_with("readers.")) {
            return Err(Error::MalformedTemplate(format!(
                "stage 0 must be a reader stage, found type {:?}",
                reader_type
            )));
        }

        let reprojection_type = self.stage_type(2);
        if reprojection_type != Some("filters.reprojection") {
            return Err(Error::MalformedTemplate(format!(
                "stage 2 must be a filters.reprojection stage, found type {:?}",
                reprojection_type
            )));
        }

        Ok(())
    }

    fn stage_type(&self, stage: usize) -> Option<&str> {
        self.pipeline.get(stage)?.get("type")?.as_str()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.pipeline
    }

    /// Parameterize this template into a request ready for the engine.
    ///
    /// Deep-copies the template (the template itself is never mutated),
    /// writes the polygon WKT and `{url}/{region}/ept.json` into the reader
    /// stage, and the `EPSG:<code>` pair into the reprojection stage. Pure
    /// function of its inputs; no network access.
    pub fn build_request(
        &self,
        url: &str,
        region: &str,
        in_epsg: i32,
        out_epsg: i32,
        polygon: &RegionPolygon,
    ) -> Result<PipelineRequest> {
        let mut stages = self.pipeline.clone();
        let wkt = polygon.to_wkt()?;

        stages[0].insert("polygon".to_string(), Value::String(wkt));
        stages[0].insert(
            "filename".to_string(),
            Value::String(format!("{}/{}/ept.json", url, region)),
        );
        stages[2].insert(
            "in_srs".to_string(),
            Value::String(GeoCore::new(in_epsg).srs()),
        );
        stages[2].insert(
            "out_srs".to_string(),
            Value::String(GeoCore::new(out_epsg).srs()),
        );

        Ok(PipelineRequest { pipeline: stages })
    }
}

/// A fully parameterized pipeline request. Created fresh per fetch call,
/// consumed once by the engine, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRequest {
    pipeline: Vec<Stage>,
}

impl PipelineRequest {
    pub fn stages(&self) -> &[Stage] {
        &self.pipeline
    }

    /// String field of a stage, if present.
    pub fn stage_str(&self, stage: usize, key: &str) -> Option<&str> {
        self.pipeline.get(stage)?.get(key)?.as_str()
    }

    /// The request in the engine's JSON wire format.
    pub fn to_json(&self) -> Value {
        let stages = self.pipeline.iter().cloned().map(Value::Object).collect();
        let mut root = Map::new();
        root.insert("pipeline".to_string(), Value::Array(stages));
        Value::Object(root)
    }
}

/// Locate the pipeline template document: the copy bundled with the crate
/// sources first, then the working directory.
pub fn find_template_file() -> Result<PathBuf> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let bundled = PathBuf::from(manifest_dir)
        .join("src/collect/usgs/data")
        .join(PIPELINE_TEMPLATE_NAME);
    if bundled.exists() {
        return Ok(bundled);
    }

    for path in &[
        PathBuf::from(PIPELINE_TEMPLATE_NAME),
        PathBuf::from("./src/collect/usgs/data").join(PIPELINE_TEMPLATE_NAME),
    ] {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    Err(Error::TemplateNotFound {
        path: PathBuf::from(PIPELINE_TEMPLATE_NAME),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_template() -> PipelineTemplate {
        let raw = serde_json::json!({
            "pipeline": [
                {"type": "readers.ept", "filename": "", "polygon": "", "tag": "readdata"},
                {"type": "filters.range", "limits": "Classification![7:7]"},
                {"type": "filters.reprojection", "in_srs": "", "out_srs": ""}
            ]
        });
        PipelineTemplate::from_json(&raw.to_string()).unwrap()
    }

    fn sample_polygon() -> RegionPolygon {
        RegionPolygon::new(
            &[
                (-93.756155, 41.918015),
                (-93.756155, 41.921429),
                (-93.747334, 41.921429),
                (-93.747334, 41.918015),
            ],
            4326,
        )
        .unwrap()
    }

    #[test]
    fn test_build_request_parameterizes_stages() {
        let template = sample_template();
        let request = template
            .build_request(
                "https://example-bucket",
                "IA_FullState",
                3857,
                4326,
                &sample_polygon(),
            )
            .unwrap();

        assert_eq!(
            request.stage_str(0, "filename"),
            Some("https://example-bucket/IA_FullState/ept.json")
        );
        assert_eq!(request.stage_str(2, "in_srs"), Some("EPSG:3857"));
        assert_eq!(request.stage_str(2, "out_srs"), Some("EPSG:4326"));
        assert!(request
            .stage_str(0, "polygon")
            .unwrap()
            .starts_with("POLYGON"));
    }

    #[test]
    fn test_build_request_is_pure_and_idempotent() {
        let template = sample_template();
        let snapshot = template.clone();
        let polygon = sample_polygon();

        let first = template
            .build_request("https://example-bucket", "IA_FullState", 3857, 4326, &polygon)
            .unwrap();
        let second = template
            .build_request("https://example-bucket", "IA_FullState", 3857, 4326, &polygon)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(template, snapshot);
    }

    #[test]
    fn test_untouched_stages_survive() {
        let template = sample_template();
        let request = template
            .build_request("https://example-bucket", "IA_FullState", 3857, 4326, &sample_polygon())
            .unwrap();
        assert_eq!(
            request.stage_str(1, "limits"),
            Some("Classification![7:7]")
        );
    }

    #[test]
    fn test_too_few_stages_rejected() {
        let raw = serde_json::json!({
            "pipeline": [
                {"type": "readers.ept"},
                {"type": "filters.reprojection"}
            ]
        });
        let result = PipelineTemplate::from_json(&raw.to_string());
        assert!(matches!(result, Err(Error::MalformedTemplate(_))));
    }

    #[test]
    fn test_non_reader_first_stage_rejected() {
        let raw = serde_json::json!({
            "pipeline": [
                {"type": "filters.range"},
                {"type": "filters.range"},
                {"type": "filters.reprojection"}
            ]
        });
        let result = PipelineTemplate::from_json(&raw.to_string());
        assert!(matches!(result, Err(Error::MalformedTemplate(_))));
    }

    #[test]
    fn test_non_reprojection_third_stage_rejected() {
        let raw = serde_json::json!({
            "pipeline": [
                {"type": "readers.ept"},
                {"type": "filters.range"},
                {"type": "filters.range"}
            ]
        });
        let result = PipelineTemplate::from_json(&raw.to_string());
        assert!(matches!(result, Err(Error::MalformedTemplate(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = PipelineTemplate::from_json("{\"pipeline\": 12}");
        assert!(matches!(result, Err(Error::MalformedTemplate(_))));
    }

    #[test]
    fn test_bundled_template_loads() {
        let path = find_template_file().unwrap();
        let template = PipelineTemplate::from_file(&path).unwrap();
        assert_eq!(template.stages().len(), 3);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = PipelineTemplate::from_file(Path::new("/nonexistent/pipeline.json"));
        assert!(matches!(result, Err(Error::TemplateNotFound { .. })));
    }

    #[test]
    fn test_request_json_round_trips() {
        let template = sample_template();
        let request = template
            .build_request("https://example-bucket", "IA_FullState", 3857, 4326, &sample_polygon())
            .unwrap();
        let json = request.to_json();
        assert_eq!(
            json["pipeline"][0]["filename"],
            serde_json::json!("https://example-bucket/IA_FullState/ept.json")
        );
        assert_eq!(json["pipeline"].as_array().unwrap().len(), 3);
    }
}
