mod projector;
mod render;
pub mod views;

pub use projector::{ProjectionError, ReportProjector};
pub use render::{DocumentRenderer, PlainTextRenderer, RenderError, RenderedReport};
pub use views::ReportDocument;
