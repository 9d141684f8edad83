use anyhow::Result;
use rs3dep::collect::global_variables::get_temp_path;
use rs3dep::collect::usgs::{PipelineEngine, PipelineRequest, UsgsCollect};
use rs3dep::plot::{plot_heatmap, render_3d, show_on_map};

/// Stand-in for the external execution engine: returns a deterministic grid
/// of rows shaped like engine output (trailing x, y, elevation fields). A
/// real deployment would wire in a PDAL-style engine behind the same trait.
struct SampleEngine;

impl PipelineEngine for SampleEngine {
    fn execute(
        &self,
        _request: &PipelineRequest,
    ) -> std::result::Result<Vec<Vec<f64>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = Vec::new();
        for i in 0..40 {
            for j in 0..40 {
                let x = -93.756155 + f64::from(i) * 0.0002;
                let y = 41.918015 + f64::from(j) * 0.0001;
                let z = 280.0 + 20.0 * ((f64::from(i) * 0.3).sin() + (f64::from(j) * 0.2).cos());
                rows.push(vec![1.0, 2.0, 3.0, x, y, z]);
            }
        }
        Ok(rows)
    }
}

/// Example: fetch through a canned engine, then render the heatmap, the 3D
/// scatter and the interactive polygon map.
fn main() -> Result<()> {
    println!("=== Example: plotting a fetched point table ===\n");

    let coordinates = vec![
        (-93.756155, 41.918015),
        (-93.756155, 41.921429),
        (-93.747334, 41.921429),
        (-93.747334, 41.918015),
    ];

    let collector = UsgsCollect::new(&coordinates, "IA_FullState")?;
    let table = collector.fetch(&SampleEngine)?;

    println!("Fetched {} points (EPSG:{})", table.len(), table.epsg());
    if let Some((lo, hi)) = table.elevation_range() {
        println!("Elevation range: {:.1} m to {:.1} m", lo, hi);
    }

    let out_dir = get_temp_path();
    std::fs::create_dir_all(&out_dir)?;

    let heatmap_path = out_dir.join("terrain_heatmap.png");
    plot_heatmap(&table, &heatmap_path, "Terrain elevation")?;
    println!("Heatmap saved to {:?}", heatmap_path);

    let scatter_path = out_dir.join("terrain_3d.png");
    render_3d(&table, &scatter_path, 2)?;
    println!("3D scatter saved to {:?}", scatter_path);

    let map_path = out_dir.join("region_map.html");
    show_on_map(collector.polygon(), &map_path, 15)?;
    println!("Interactive map saved to {:?}", map_path);

    Ok(())
}
