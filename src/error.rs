use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the rs3dep pipeline and loaders.
/// Every failure is a distinct, catchable variant; nothing is printed and
/// swallowed. Only `EmptyResult` is meant to be recovered from locally.
#[derive(Debug, Error)]
pub enum Error {
    /// Fewer than three vertices, non-finite values, a zero-area ring, or a
    /// self-intersection reported by GEOS.
    #[error("invalid polygon geometry: {0}")]
    InvalidGeometry(String),

    /// The pipeline template does not have the expected stage shape.
    #[error("malformed pipeline template: {0}")]
    MalformedTemplate(String),

    /// The pipeline template document is missing.
    #[error("pipeline template not found at {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// An engine output row with fewer than the three trailing x/y/z fields.
    #[error("malformed result row {index}: expected at least 3 fields, found {len}")]
    MalformedRow { index: usize, len: usize },

    /// The engine ran the pipeline but produced zero points. Callers may
    /// treat this as "nothing inside the polygon" rather than a failure.
    #[error("pipeline execution returned no points")]
    EmptyResult,

    /// EPSG code outside the supported fixed conversion pair {3857, 4326}.
    #[error("unsupported coordinate reference system EPSG:{0}")]
    UnsupportedCrs(i32),

    /// The external execution engine failed to run the pipeline.
    #[error("pipeline execution failed")]
    EngineExecution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Fetching or decoding the remote `ept.json` metadata failed.
    #[error("EPT metadata request failed")]
    MetadataFetch(#[from] reqwest::Error),

    #[error("invalid endpoint URL {url}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    ProjCreate(#[from] proj::ProjCreateError),

    #[error(transparent)]
    Proj(#[from] proj::ProjError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "polars")]
    #[error(transparent)]
    DataFrame(#[from] polars::error::PolarsError),

    #[cfg(feature = "plot")]
    #[error("failed to render plot: {0}")]
    Render(String),
}
