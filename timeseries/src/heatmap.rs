//! Weekly activity heatmap: 168 UTC hour buckets (day-major, hour-minor)
//! normalized to a 0-10 intensity grid in the viewer's timezone.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::period::{Granularity, Period};

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;
pub const HOURS_PER_WEEK: usize = DAYS_PER_WEEK * HOURS_PER_DAY;
pub const MAX_INTENSITY: u8 = 10;

/// Source data is UTC; the dashboard displays UTC+8.
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 8;

/// One heatmap cell. Serializes as `"-"` for no data, else the intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatCell {
    NoData,
    Intensity(u8),
}

impl HeatCell {
    fn from_intensity(intensity: u8) -> Self {
        if intensity == 0 {
            HeatCell::NoData
        } else {
            HeatCell::Intensity(intensity.min(MAX_INTENSITY))
        }
    }

    pub fn intensity(&self) -> u8 {
        match self {
            HeatCell::NoData => 0,
            HeatCell::Intensity(i) => *i,
        }
    }

    pub fn band(&self) -> ColorBand {
        ColorBand::for_intensity(self.intensity())
    }
}

impl Serialize for HeatCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HeatCell::NoData => serializer.serialize_str("-"),
            HeatCell::Intensity(i) => serializer.serialize_u8(*i),
        }
    }
}

/// GitHub-style colour bands over the 0-10 intensity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBand {
    /// 0
    Empty,
    /// 1-2
    Low,
    /// 3-5
    Medium,
    /// 6-8
    High,
    /// 9-10
    Peak,
}

impl ColorBand {
    pub fn for_intensity(intensity: u8) -> Self {
        match intensity {
            0 => ColorBand::Empty,
            1..=2 => ColorBand::Low,
            3..=5 => ColorBand::Medium,
            6..=8 => ColorBand::High,
            _ => ColorBand::Peak,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ColorBand::Empty => "#ebedf0",
            ColorBand::Low => "#9be9a8",
            ColorBand::Medium => "#40c463",
            ColorBand::High => "#30a14e",
            ColorBand::Peak => "#216e39",
        }
    }
}

/// Scales raw counts to `ceil(v * 10 / max)`.
///
/// Returns an empty vec unless `raw` holds exactly [`HOURS_PER_WEEK`] values
/// with a positive maximum.
pub fn normalize(raw: &[f64]) -> Vec<u8> {
    if raw.len() != HOURS_PER_WEEK {
        return Vec::new();
    }
    let max = raw.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 || !max.is_finite() {
        return Vec::new();
    }
    raw.iter()
        .map(|v| {
            let scaled = (v * f64::from(MAX_INTENSITY) / max).ceil();
            scaled.clamp(0.0, f64::from(MAX_INTENSITY)) as u8
        })
        .collect()
}

/// UTC hour read for a display hour. The day index is not shifted when this
/// wraps past midnight.
pub fn utc_hour_for_display(display_hour: usize, offset_hours: i32) -> usize {
    (display_hour as i64 - i64::from(offset_hours)).rem_euclid(HOURS_PER_DAY as i64) as usize
}

pub fn display_hour_for_utc(utc_hour: usize, offset_hours: i32) -> usize {
    (utc_hour as i64 + i64::from(offset_hours)).rem_euclid(HOURS_PER_DAY as i64) as usize
}

/// Seven rows of 24 cells, or no rows when there is nothing to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeatmapGrid {
    rows: Vec<[HeatCell; HOURS_PER_DAY]>,
}

impl HeatmapGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[HeatCell; HOURS_PER_DAY]] {
        &self.rows
    }

    pub fn cell(&self, day: usize, hour: usize) -> Option<HeatCell> {
        self.rows.get(day)?.get(hour).copied()
    }

    /// `(hour, 6 - day, cell)` triples, day-major, for calendar charts that
    /// draw the first day on the top row.
    pub fn chart_points(&self) -> Vec<(usize, usize, HeatCell)> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(day, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(hour, cell)| (hour, DAYS_PER_WEEK - 1 - day, *cell))
            })
            .collect()
    }
}

/// Normalizes `raw` and lays it out in display time.
pub fn normalize_heatmap(raw: &[f64], display_offset_hours: i32) -> HeatmapGrid {
    let normalized = normalize(raw);
    if normalized.is_empty() {
        return HeatmapGrid::default();
    }

    let rows: Vec<[HeatCell; HOURS_PER_DAY]> = (0..DAYS_PER_WEEK)
        .map(|day| {
            std::array::from_fn(|hour| {
                let utc_hour = utc_hour_for_display(hour, display_offset_hours);
                HeatCell::from_intensity(normalized[day * HOURS_PER_DAY + utc_hour])
            })
        })
        .collect();
    HeatmapGrid { rows }
}

/// Per-period 168-bucket activity arrays, as served for a project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<f64>>")]
pub struct ActivityHeatmap {
    periods: BTreeMap<Period, Vec<f64>>,
}

impl ActivityHeatmap {
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<f64>)>,
        K: AsRef<str>,
    {
        let mut periods = BTreeMap::new();
        for (key, values) in entries {
            match key.as_ref().parse::<Period>() {
                Ok(period) => {
                    periods.insert(period, values);
                }
                Err(e) => debug!("dropping heatmap entry: {e}"),
            }
        }
        ActivityHeatmap { periods }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn raw(&self, period: &Period) -> Option<&[f64]> {
        self.periods.get(period).map(Vec::as_slice)
    }

    /// Years covered by any period, newest first.
    pub fn available_years(&self) -> Vec<String> {
        self.periods
            .keys()
            .map(|p| p.year_number())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .map(|y| format!("{y:04}"))
            .collect()
    }

    pub fn available_quarters(&self, year: i32) -> Vec<String> {
        self.keys_in(Granularity::Quarterly, year)
            .map(|p| p.to_string())
            .collect()
    }

    pub fn available_months(&self, year: i32) -> Vec<String> {
        self.keys_in(Granularity::Monthly, year)
            .map(|p| p.to_string())
            .collect()
    }

    /// Most recent period of `granularity` within `year`.
    pub fn latest_period(&self, granularity: Granularity, year: i32) -> Option<Period> {
        self.keys_in(granularity, year).last()
    }

    pub fn grid(&self, period: &Period, display_offset_hours: i32) -> HeatmapGrid {
        self.raw(period)
            .map(|raw| normalize_heatmap(raw, display_offset_hours))
            .unwrap_or_default()
    }

    fn keys_in(&self, granularity: Granularity, year: i32) -> impl Iterator<Item = Period> + '_ {
        self.periods
            .keys()
            .filter(move |p| p.granularity() == granularity && p.year_number() == year)
            .copied()
    }
}

impl From<BTreeMap<String, Vec<f64>>> for ActivityHeatmap {
    fn from(raw: BTreeMap<String, Vec<f64>>) -> Self {
        ActivityHeatmap::from_entries(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(index: usize, value: f64) -> Vec<f64> {
        let mut raw = vec![0.0; HOURS_PER_WEEK];
        raw[index] = value;
        raw
    }

    #[test]
    fn rejects_wrong_length_and_silence() {
        assert!(normalize(&[1.0; 167]).is_empty());
        assert!(normalize(&[1.0; 169]).is_empty());
        assert!(normalize(&[0.0; HOURS_PER_WEEK]).is_empty());
        assert!(normalize_heatmap(&[0.0; HOURS_PER_WEEK], 8).is_empty());
        assert!(normalize_heatmap(&[], 8).is_empty());
    }

    #[test]
    fn single_spike_normalizes_to_ten() {
        let normalized = normalize(&spike(30, 42.0));
        assert_eq!(normalized[30], 10);
        assert_eq!(normalized.iter().filter(|&&v| v != 0).count(), 1);
    }

    #[test]
    fn normalization_rounds_up() {
        let mut raw = spike(0, 100.0);
        raw[1] = 1.0;
        raw[2] = 50.0;
        raw[3] = 51.0;
        let normalized = normalize(&raw);
        assert_eq!(&normalized[..4], &[10, 1, 5, 6]);
    }

    #[test]
    fn hour_shift_for_utc_plus_eight() {
        assert_eq!(display_hour_for_utc(16, 8), 0);
        assert_eq!(utc_hour_for_display(0, 8), 16);
        assert_eq!(utc_hour_for_display(8, 8), 0);
        assert_eq!(utc_hour_for_display(5, -3), 8);
        for hour in 0..HOURS_PER_DAY {
            assert_eq!(display_hour_for_utc(utc_hour_for_display(hour, 8), 8), hour);
        }
    }

    #[test]
    fn grid_shifts_hours_but_not_days() {
        // Monday (day 0), 16:00 UTC
        let grid = normalize_heatmap(&spike(16, 3.0), DEFAULT_DISPLAY_OFFSET_HOURS);
        assert_eq!(grid.rows().len(), DAYS_PER_WEEK);
        assert_eq!(grid.cell(0, 0), Some(HeatCell::Intensity(10)));
        assert_eq!(grid.cell(0, 16), Some(HeatCell::NoData));
        assert_eq!(grid.cell(1, 0), Some(HeatCell::NoData));
        assert_eq!(grid.cell(7, 0), None);
    }

    #[test]
    fn chart_points_flip_rows() {
        let grid = normalize_heatmap(&spike(16, 3.0), 8);
        let points = grid.chart_points();
        assert_eq!(points.len(), HOURS_PER_WEEK);
        assert_eq!(points[0], (0, 6, HeatCell::Intensity(10)));
        assert_eq!(points[HOURS_PER_WEEK - 1].1, 0);
    }

    #[test]
    fn color_band_boundaries() {
        let expected = [
            (0, ColorBand::Empty),
            (1, ColorBand::Low),
            (2, ColorBand::Low),
            (3, ColorBand::Medium),
            (5, ColorBand::Medium),
            (6, ColorBand::High),
            (8, ColorBand::High),
            (9, ColorBand::Peak),
            (10, ColorBand::Peak),
        ];
        for (intensity, band) in expected {
            assert_eq!(ColorBand::for_intensity(intensity), band, "intensity {intensity}");
        }
        assert_eq!(HeatCell::NoData.band().color(), "#ebedf0");
    }

    #[test]
    fn cells_serialize_like_chart_input() {
        let json = serde_json::to_string(&[HeatCell::NoData, HeatCell::Intensity(4)]).unwrap();
        assert_eq!(json, r#"["-",4]"#);
    }

    #[test]
    fn catalog_lists_periods() {
        let heatmap = ActivityHeatmap::from_entries([
            ("2023", spike(0, 1.0)),
            ("2024", spike(0, 1.0)),
            ("2024Q1", spike(0, 1.0)),
            ("2024Q3", spike(0, 1.0)),
            ("2024-02", spike(0, 1.0)),
            ("2024-08", spike(0, 1.0)),
            ("2024-8", spike(0, 1.0)),
        ]);
        assert_eq!(heatmap.available_years(), ["2024", "2023"]);
        assert_eq!(heatmap.available_quarters(2024), ["2024Q1", "2024Q3"]);
        assert_eq!(heatmap.available_months(2024), ["2024-02", "2024-08"]);
        assert!(heatmap.available_months(2023).is_empty());
        assert_eq!(
            heatmap.latest_period(Granularity::Monthly, 2024),
            Some("2024-08".parse().unwrap())
        );
        assert_eq!(heatmap.latest_period(Granularity::Quarterly, 2023), None);

        let year: Period = "2023".parse().unwrap();
        assert!(!heatmap.grid(&year, 8).is_empty());
        let missing: Period = "2020".parse().unwrap();
        assert!(heatmap.grid(&missing, 8).is_empty());
    }

    #[test]
    fn short_arrays_render_nothing() {
        let heatmap = ActivityHeatmap::from_entries([("2024", vec![1.0; 24])]);
        assert!(heatmap.grid(&"2024".parse().unwrap(), 8).is_empty());
    }

    #[test]
    fn years_are_newest_first_across_granularities() {
        let heatmap = ActivityHeatmap::from_entries([
            ("2023-05", spike(0, 1.0)),
            ("2024Q1", spike(0, 1.0)),
            ("2022", spike(0, 1.0)),
        ]);
        let years = heatmap.available_years();
        assert_eq!(years, ["2024", "2023", "2022"]);
        assert_eq!(years.first().map(String::as_str), Some("2024"));
    }
}
