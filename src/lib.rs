//! chart-lifecycle: render-lifecycle controller for dashboard charts.
//!
//! An update gate decides whether a new input snapshot warrants a redraw, and
//! a render supervisor runs each redraw attempt against an external drawing
//! engine, reports the outcome to an external status store and times
//! result-driven renders for telemetry.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{ChartRenderConfig, ChartRenderController, RenderSupervisor};
pub use error::{ChartError, ChartResult};
