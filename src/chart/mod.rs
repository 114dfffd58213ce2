/// Chart selection: plot requests in, backend-agnostic recipes out.
///
/// ```text
///   PlotRequest ──┐
///                 ▼
///   Dataset ──▶ render ──▶ Option<ChartSpec> ──▶ ui::plot
///                 │
///                 └── stats::{outlier, summary, correlation}
/// ```
pub mod render;
pub mod request;
pub mod spec;

pub use render::render;
pub use request::{PlotKind, PlotRequest};
pub use spec::ChartSpec;
