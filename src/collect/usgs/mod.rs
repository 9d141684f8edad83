pub mod ept;
pub mod pipeline;
pub mod usgs_collect;

pub use ept::EptMetadata;
pub use pipeline::{PipelineEngine, PipelineRequest, PipelineTemplate};
pub use usgs_collect::UsgsCollect;
