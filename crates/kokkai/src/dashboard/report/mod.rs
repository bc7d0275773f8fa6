mod heatmap;
mod summary;
pub mod views;

pub use heatmap::{build_heatmap, HEATMAP_FOCUS_TERMS, MAX_HEATMAP_TERMS};
pub use summary::{truncate_text, DashboardReport, ReportSettings};
