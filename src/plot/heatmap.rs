use std::path::Path;

use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::error::{Error, Result};
use crate::geometric::PointTable;
use crate::plot::render_err;

/// Render a 2D elevation heatmap of the table to a PNG file: one
/// colormapped marker per point over longitude/latitude axes.
pub fn plot_heatmap(table: &PointTable, path: &Path, title: &str) -> Result<()> {
    if table.is_empty() {
        return Err(Error::Render(
            "cannot plot an empty point table".to_string(),
        ));
    }

    let (min_x, max_x, min_y, max_y) = bounds(table);
    let (min_z, max_z) = table.elevation_range().unwrap_or((0.0, 0.0));
    let pad = ((max_x - min_x).max(max_y - min_y)).max(1e-6) * 0.02;
    let span = (max_z - min_z).max(f64::EPSILON);

    let root = BitMapBackend::new(path, (1200, 1000)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_x - pad..max_x + pad, min_y - pad..max_y + pad)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(table.iter().map(|(point, z)| {
            let t = ((z - min_z) / span) as f32;
            let color = ViridisRGB.get_color(t);
            Circle::new((point.x(), point.y()), 2, color.filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

fn bounds(table: &PointTable) -> (f64, f64, f64, f64) {
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
    (min_x, max_x, min_y, max_y)
}
