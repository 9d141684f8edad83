use std::path::Path;

use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::error::{Error, Result};
use crate::geometric::PointTable;
use crate::plot::render_err;

/// Render a 3D terrain scatter of the table to a PNG file. Elevation is the
/// vertical axis; markers are colormapped by elevation like the heatmap.
pub fn render_3d(table: &PointTable, path: &Path, point_size: u32) -> Result<()> {
    if table.is_empty() {
        return Err(Error::Render(
            "cannot plot an empty point table".to_string(),
        ));
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for point in table.geometry() {
        min_x = min_x.min(point.x());
        max_x = max_x.max(point.x());
        min_y = min_y.min(point.y());
        max_y = max_y.max(point.y());
    }
    let (min_z, max_z) = table.elevation_range().unwrap_or((0.0, 0.0));

    let pad_xy = ((max_x - min_x).max(max_y - min_y)).max(1e-6) * 0.02;
    let pad_z = (max_z - min_z).max(1e-6) * 0.02;
    let span = (max_z - min_z).max(f64::EPSILON);

    let root = BitMapBackend::new(path, (1200, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_3d(
            min_x - pad_xy..max_x + pad_xy,
            min_z - pad_z..max_z + pad_z,
            min_y - pad_xy..max_y + pad_xy,
        )
        .map_err(render_err)?;

    chart.configure_axes().draw().map_err(render_err)?;

    chart
        .draw_series(table.iter().map(|(point, z)| {
            let t = ((z - min_z) / span) as f32;
            let color = ViridisRGB.get_color(t);
            Circle::new((point.x(), z, point.y()), point_size, color.filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_3d_writes_png() {
        let rows = vec![
            vec![-93.756, 41.918, 293.1],
            vec![-93.750, 41.920, 305.4],
            vec![-93.748, 41.921, 287.8],
        ];
        let table = PointTable::from_rows(&rows, 4326).unwrap();
        let path = std::env::temp_dir().join("rs3dep_test_terrain3d.png");

        render_3d(&table, &path, 2).unwrap();

        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let table = PointTable::from_rows(&[], 4326).unwrap();
        let path = std::env::temp_dir().join("rs3dep_test_terrain3d_empty.png");
        let result = render_3d(&table, &path, 2);
        assert!(matches!(result, Err(Error::Render(_))));
    }
}
