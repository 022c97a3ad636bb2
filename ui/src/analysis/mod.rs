//! Render-independent core of the analyzer: series building, chart layout,
//! pointer handling and the drill-down store.

pub mod analyzer;
pub mod color;
pub mod drilldown;
pub mod geometry;
pub mod interaction;
pub mod series;

pub use analyzer::{AnalyzerState, QueryStatus, RangeResponse, RangeTicket, RangeTotals};
pub use color::{color_for, Color};
pub use drilldown::{DrillDownError, DrillDownStore, LoadCommit, LoadPhase, LoadRequest, LoadResponse};
pub use geometry::{ChartGeometry, DateTickPolicy, PlotGeometry};
pub use interaction::{HoverState, Interaction, PointerEvent, SelectedDayContext, Tooltip};
pub use series::{build_series, date_axis, CommunitySeries, DataPoint};
