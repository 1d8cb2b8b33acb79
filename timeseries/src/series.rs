use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::period::{Granularity, Period};
use crate::summary::round2;

/// A sparse period → value map. Yearly, quarterly and monthly entries may
/// coexist; filter by granularity before aggregating.
///
/// Keys are parsed once on ingestion. Malformed keys are dropped and
/// non-finite values are stored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<f64>>",
    into = "BTreeMap<String, f64>"
)]
pub struct MetricSeries {
    values: BTreeMap<Period, f64>,
}

impl MetricSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut series = MetricSeries::new();
        for (key, value) in entries {
            let key = key.as_ref();
            match key.parse::<Period>() {
                Ok(period) => series.insert(period, value),
                Err(e) => debug!("dropping series entry: {e}"),
            }
        }
        series
    }

    pub fn insert(&mut self, period: Period, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.values.insert(period, value);
    }

    pub fn get(&self, period: &Period) -> Option<f64> {
        self.values.get(period).copied()
    }

    /// Value for `period`, with an absent period reading as zero.
    pub fn value_at(&self, period: &Period) -> f64 {
        self.get(period).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in ascending period order.
    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.values.iter().map(|(p, v)| (*p, *v))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    /// Entries of exactly one granularity, taken verbatim. Coarser periods are
    /// never rolled up from finer ones.
    pub fn filter_by_granularity(&self, granularity: Granularity) -> MetricSeries {
        self.iter()
            .filter(|(p, _)| p.granularity() == granularity)
            .collect()
    }

    /// Years offered by a month picker: distinct years of the monthly
    /// entries, newest first. Yearly and quarterly keys do not count.
    pub fn available_years(&self) -> Vec<String> {
        self.values
            .keys()
            .filter(|p| p.granularity() == Granularity::Monthly)
            .map(|p| p.year_number())
            .collect::<BTreeSet<_>>() // de-dupe
            .into_iter()
            .rev()
            .map(|y| format!("{y:04}"))
            .collect()
    }

    /// Monthly keys, ascending, optionally limited to one year.
    pub fn available_months(&self, year: Option<i32>) -> Vec<String> {
        self.values
            .keys()
            .filter(|p| p.granularity() == Granularity::Monthly)
            .filter(|p| year.is_none_or(|y| p.year_number() == y))
            .map(ToString::to_string)
            .collect()
    }

    /// Value of the chronologically last entry of any granularity.
    pub fn latest_value(&self) -> f64 {
        self.values
            .last_key_value()
            .map(|(_, v)| round2(*v))
            .unwrap_or(0.0)
    }
}

impl FromIterator<(Period, f64)> for MetricSeries {
    fn from_iter<T: IntoIterator<Item = (Period, f64)>>(iter: T) -> Self {
        let mut series = MetricSeries::new();
        for (period, value) in iter {
            series.insert(period, value);
        }
        series
    }
}

impl From<BTreeMap<String, Option<f64>>> for MetricSeries {
    fn from(raw: BTreeMap<String, Option<f64>>) -> Self {
        MetricSeries::from_raw(raw.into_iter().map(|(k, v)| (k, v.unwrap_or(0.0))))
    }
}

impl From<MetricSeries> for BTreeMap<String, f64> {
    fn from(series: MetricSeries) -> Self {
        series
            .values
            .into_iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect()
    }
}

/// Union of the monthly keys of several series, for a shared month picker.
pub fn available_months_across(series: &[&MetricSeries]) -> Vec<String> {
    series
        .iter()
        .flat_map(|s| s.values.keys())
        .filter(|p| p.granularity() == Granularity::Monthly)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}
