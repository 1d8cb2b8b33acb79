//! Calendar windows offered for side-by-side period comparison.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::period::Granularity;
use crate::series::MetricSeries;
use crate::summary::{MetricsSummary, summarize_between};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonPeriod {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ComparisonPeriod {
    /// `start` and `end` are `(month, day)` pairs within `year`.
    fn span(label: String, year: i32, start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(ComparisonPeriod {
            label,
            start: NaiveDate::from_ymd_opt(year, start.0, start.1)?,
            end: NaiveDate::from_ymd_opt(year, end.0, end.1)?,
        })
    }

    fn full_year(year: i32) -> Option<Self> {
        Self::span(format!("{year}"), year, (1, 1), (12, 31))
    }

    pub fn summarize(&self, series: &MetricSeries, granularity: Granularity) -> MetricsSummary {
        summarize_between(series, granularity, self.start, self.end)
    }
}

/// Full year, first half and second half for every year any of `series`
/// covers. Falls back to the current and previous full year when there is
/// no data.
pub fn comparison_periods(series: &[&MetricSeries], today: NaiveDate) -> Vec<ComparisonPeriod> {
    let years: BTreeSet<i32> = series
        .iter()
        .flat_map(|s| s.iter())
        .map(|(p, _)| p.year_number())
        .filter(|y| (1901..=2999).contains(y))
        .collect();

    if years.is_empty() {
        let current = today.year();
        return [current, current - 1]
            .into_iter()
            .filter_map(ComparisonPeriod::full_year)
            .collect();
    }

    years
        .into_iter()
        .flat_map(|year| {
            [
                ComparisonPeriod::full_year(year),
                ComparisonPeriod::span(format!("{year} H1"), year, (1, 1), (6, 30)),
                ComparisonPeriod::span(format!("{year} H2"), year, (7, 1), (12, 31)),
            ]
        })
        .flatten()
        .collect()
}
