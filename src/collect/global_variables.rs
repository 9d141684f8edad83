use std::path::PathBuf;

/// Public USGS 3DEP LiDAR bucket on AWS.
pub const USGS_LIDAR_URL: &str = "https://s3-us-west-2.amazonaws.com/usgs-lidar-public";

/// File name of the pipeline template document.
pub const PIPELINE_TEMPLATE_NAME: &str = "pipeline.json";

pub const TEMP_PATH: &str = "./temp";

pub fn get_temp_path() -> PathBuf {
    PathBuf::from(TEMP_PATH)
}
