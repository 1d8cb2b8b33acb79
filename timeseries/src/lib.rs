//! Time-series engine for project health metrics.
//!
//! Takes sparse period-keyed metric maps (yearly, quarterly and monthly keys
//! mixed in one object) and turns them into chart series, comparative
//! summaries and normalized activity heatmaps. Everything here is pure and
//! synchronous.

pub mod chart;
pub mod comparison;
pub mod format;
pub mod heatmap;
pub mod period;
pub mod selector;
pub mod series;
pub mod summary;

pub use chart::{AlignedPoint, ChartDataPoint, align_series, generate_chart_series};
pub use comparison::{ComparisonPeriod, comparison_periods};
pub use heatmap::{ActivityHeatmap, ColorBand, HeatCell, HeatmapGrid, normalize_heatmap};
pub use period::{
    Granularity, MonthSelection, ParsedKey, Period, PeriodError, classify, classify_and_parse_key,
};
pub use selector::TimeSelector;
pub use series::{MetricSeries, available_months_across};
pub use summary::{
    MetricsSummary, Trend, resolve_range_summary, resolve_specific_month, resolve_summary,
    summarize_between,
};
