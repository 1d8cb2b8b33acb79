use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::period::{Granularity, MonthSelection, Period};
use crate::selector::TimeSelector;
use crate::series::MetricSeries;
use crate::summary::round2;

/// How many months (focal month included) a specific-month chart shows.
pub const TRAILING_WINDOW_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataPoint {
    pub date: String,
    pub value: f64,
    pub period: Period,
    #[serde(rename = "label")]
    pub granularity: Granularity,
}

impl ChartDataPoint {
    fn new(period: Period, value: f64) -> Self {
        ChartDataPoint {
            date: period.chart_label(),
            value: round2(value),
            period,
            granularity: period.granularity(),
        }
    }
}

pub fn generate_chart_series(
    series: &MetricSeries,
    selector: &TimeSelector,
) -> Vec<ChartDataPoint> {
    match *selector {
        TimeSelector::Range { range } => series
            .filter_by_granularity(range)
            .iter()
            .map(|(p, v)| ChartDataPoint::new(p, v))
            .collect(),
        TimeSelector::Specific { specific } => trailing_months(series, specific),
    }
}

/// Up to [`TRAILING_WINDOW_MONTHS`] months ending at `selection`, keeping only
/// months the series actually has.
fn trailing_months(series: &MetricSeries, selection: MonthSelection) -> Vec<ChartDataPoint> {
    (0..TRAILING_WINDOW_MONTHS)
        .rev()
        .filter_map(|back| selection.months_back(back))
        .filter_map(|p| series.get(&p).map(|v| ChartDataPoint::new(p, v)))
        .collect()
}

/// One x-axis position of a multi-series chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub date: String,
    #[serde(skip)]
    pub period: Period,
    /// Series name → value. Every input series has an entry.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
    /// Series whose value here is a zero fill rather than data.
    #[serde(skip)]
    pub missing: BTreeSet<String>,
}

/// Merges independently generated series onto a shared x-axis. A period
/// missing from one series is filled with zero for that series.
pub fn align_series(series: &[(&str, &[ChartDataPoint])]) -> Vec<AlignedPoint> {
    let mut aligned: BTreeMap<Period, AlignedPoint> = BTreeMap::new();

    for (name, points) in series {
        for point in *points {
            aligned
                .entry(point.period)
                .or_insert_with(|| AlignedPoint {
                    date: point.date.clone(),
                    period: point.period,
                    values: BTreeMap::new(),
                    missing: BTreeSet::new(),
                })
                .values
                .insert((*name).to_owned(), point.value);
        }
    }

    for point in aligned.values_mut() {
        for (name, _) in series {
            if !point.values.contains_key(*name) {
                point.values.insert((*name).to_owned(), 0.0);
                point.missing.insert((*name).to_owned());
            }
        }
    }

    aligned.into_values().collect()
}
