//! Comparative statistics: current vs. previous period, trend, totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::period::{Granularity, MonthSelection};
use crate::selector::TimeSelector;
use crate::series::MetricSeries;

/// Change percentages within `±TREND_DEAD_BAND` (inclusive) count as stable.
pub const TREND_DEAD_BAND: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn from_change(change_percentage: f64) -> Self {
        if change_percentage > TREND_DEAD_BAND {
            Trend::Up
        } else if change_percentage < -TREND_DEAD_BAND {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub current_value: f64,
    pub previous_value: f64,
    pub change_percentage: f64,
    pub trend: Trend,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub latest: f64,
    pub total_periods: usize,
}

/// Rounds to two decimal places. Non-finite input yields zero.
pub(crate) fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`.
///
/// A zero `previous` yields 0, so a jump from 0 to any value reports as no
/// change.
pub fn change_percentage(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    let change = (current - previous) / previous * 100.0;
    if change.is_finite() { change } else { 0.0 }
}

/// Summary of one month against the month before it. Absent months read as
/// zero.
pub fn resolve_specific_month(series: &MetricSeries, selection: MonthSelection) -> MetricsSummary {
    let current = series.value_at(&selection.period());
    let previous = selection
        .previous()
        .map(|p| series.value_at(&p))
        .unwrap_or(0.0);
    let change = change_percentage(current, previous);
    let current = round2(current);

    MetricsSummary {
        current_value: current,
        previous_value: round2(previous),
        change_percentage: round2(change),
        trend: Trend::from_change(change),
        total: current,
        average: current,
        max: current,
        min: current,
        latest: current,
        total_periods: 1,
    }
}

/// Aggregate picture across every period of `granularity`.
pub fn resolve_range_summary(series: &MetricSeries, granularity: Granularity) -> MetricsSummary {
    let values: Vec<f64> = series.filter_by_granularity(granularity).values().collect();
    summarize_values(&values)
}

/// Same arithmetic as [`resolve_range_summary`], restricted to periods whose
/// anchor date lies within `start..=end`.
pub fn summarize_between(
    series: &MetricSeries,
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
) -> MetricsSummary {
    let values: Vec<f64> = series
        .filter_by_granularity(granularity)
        .iter()
        .filter(|(p, _)| (start..=end).contains(&p.anchor_date()))
        .map(|(_, v)| v)
        .collect();
    summarize_values(&values)
}

pub fn resolve_summary(series: &MetricSeries, selector: &TimeSelector) -> MetricsSummary {
    match *selector {
        TimeSelector::Range { range } => resolve_range_summary(series, range),
        TimeSelector::Specific { specific } => resolve_specific_month(series, specific),
    }
}

/// Summarizes values that are already in ascending period order.
fn summarize_values(values: &[f64]) -> MetricsSummary {
    let Some(&current) = values.last() else {
        return MetricsSummary::default();
    };
    let previous = values
        .len()
        .checked_sub(2)
        .map(|i| values[i])
        .unwrap_or(0.0);

    let total: f64 = values.iter().sum();
    let average = total / values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let change = change_percentage(current, previous);

    MetricsSummary {
        current_value: round2(current),
        previous_value: round2(previous),
        change_percentage: round2(change),
        trend: Trend::from_change(change),
        total: round2(total),
        average: round2(average),
        max: round2(max),
        min: round2(min),
        latest: round2(current),
        total_periods: values.len(),
    }
}
