//! Components that present a range query's results.

mod charts;
pub use charts::TimeseriesChart;

mod detail;
pub use detail::SessionDetailsPanel;

mod summary;
pub use summary::ResultsSummary;
