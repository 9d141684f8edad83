pub mod heatmap;
pub mod map;
pub mod terrain3d;

pub use heatmap::plot_heatmap;
pub use map::show_on_map;
pub use terrain3d::render_3d;

pub(crate) fn render_err<E: std::fmt::Display>(e: E) -> crate::Error {
    crate::Error::Render(e.to_string())
}
