//! Charts module - Chart rendering

pub mod palette;
mod plotter;
mod renderer;

pub use plotter::{color, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};
