use timeseries::heatmap::{HOURS_PER_WEEK, display_hour_for_utc, utc_hour_for_display};
use timeseries::{
    Granularity, HeatCell, MetricSeries, MonthSelection, TimeSelector, Trend, classify,
    generate_chart_series, normalize_heatmap, resolve_range_summary, resolve_specific_month,
    resolve_summary,
};

#[test]
fn classification_is_deterministic() {
    assert_eq!(classify("2024"), Granularity::Yearly);
    assert_eq!(classify("2024Q2"), Granularity::Quarterly);
    assert_eq!(classify("2024-07"), Granularity::Monthly);
}

#[test]
fn monthly_range_end_to_end() {
    let series: MetricSeries =
        serde_json::from_str(r#"{"2024-01": 10, "2024-02": 20, "2024-03": 0}"#).unwrap();
    let selector = TimeSelector::range(Granularity::Monthly);

    let points = generate_chart_series(&series, &selector);
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    assert_eq!(values, [10.0, 20.0, 0.0]);

    let summary = resolve_range_summary(&series, Granularity::Monthly);
    assert_eq!(summary.total, 30.0);
    assert_eq!(summary.average, 10.0);
    assert_eq!(summary.max, 20.0);
    assert_eq!(summary.min, 0.0);
    assert_eq!(summary.current_value, 0.0);
    assert_eq!(summary.previous_value, 20.0);
    assert_eq!(summary.change_percentage, -100.0);
    assert_eq!(summary.trend, Trend::Down);
    assert_eq!(resolve_summary(&series, &selector), summary);
}

#[test]
fn missing_month_defaults_to_zero() {
    let series = MetricSeries::from_raw([("2024-01", 5.0)]);
    let summary = resolve_specific_month(&series, MonthSelection::new(2024, 2).unwrap());
    assert_eq!(summary.current_value, 0.0);
    assert_eq!(summary.previous_value, 5.0);
    assert_eq!(summary.change_percentage, -100.0);
    assert_eq!(summary.trend, Trend::Down);
}

#[test]
fn january_compares_with_previous_december() {
    let selection = MonthSelection::new(2024, 1).unwrap();
    assert_eq!(selection.previous().unwrap().to_string(), "2023-12");
}

#[test]
fn change_percentage_is_always_finite() {
    let cases = [
        MetricSeries::new(),
        MetricSeries::from_raw([("2024-01", 3.0)]),
        MetricSeries::from_raw([("2024-01", 0.0), ("2024-02", 1000.0)]),
        MetricSeries::from_raw([("2024-01", f64::NAN), ("2024-02", 1.0)]),
    ];
    let selection = MonthSelection::new(2024, 2).unwrap();
    for series in &cases {
        for granularity in Granularity::ALL {
            assert!(resolve_range_summary(series, granularity).change_percentage.is_finite());
        }
        let specific = resolve_specific_month(series, selection);
        assert!(specific.change_percentage.is_finite());
    }
}

#[test]
fn heatmap_spike_and_shift() {
    assert!(normalize_heatmap(&[0.0; HOURS_PER_WEEK], 8).is_empty());

    // Wednesday 16:00 UTC is 00:00 on the Wednesday row in UTC+8
    let mut raw = vec![0.0; HOURS_PER_WEEK];
    raw[2 * 24 + 16] = 7.0;
    let grid = normalize_heatmap(&raw, 8);

    assert_eq!(display_hour_for_utc(16, 8), 0);
    assert_eq!(utc_hour_for_display(0, 8), 16);
    assert_eq!(grid.cell(2, 0), Some(HeatCell::Intensity(10)));

    let lit = grid
        .rows()
        .iter()
        .flatten()
        .filter(|c| **c != HeatCell::NoData)
        .count();
    assert_eq!(lit, 1);
}
