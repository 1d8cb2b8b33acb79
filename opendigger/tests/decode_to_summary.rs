use opendigger::{Metric, Platform, ProjectRef, decode_heatmap, decode_metric};
use serde_json::json;
use timeseries::{
    Granularity, HeatCell, MonthSelection, TimeSelector, Trend, generate_chart_series,
    normalize_heatmap, resolve_summary,
};

#[test]
fn duration_metric_feeds_monthly_summary() {
    let project = ProjectRef::parse(Platform::Github, " apache/echarts ").unwrap();
    let url = format!(
        "https://oss.open-digger.cn/{}/{}",
        project.path(),
        Metric::IssueResponseTime.file_name()
    );
    let body = json!({
        "avg": {"2024-01": 10, "2024-02": 15, "2024Q1": 12.5, "2024": 11},
        "levels": {"2024-01": [1, 0, 2, 3]},
    });

    let series = decode_metric(Metric::IssueResponseTime, &url, body).unwrap();
    let summary = resolve_summary(
        &series,
        &TimeSelector::specific(MonthSelection::new(2024, 2).unwrap()),
    );
    assert_eq!(summary.current_value, 15.0);
    assert_eq!(summary.change_percentage, 50.0);
    assert_eq!(summary.trend, Trend::Up);

    let quarters = generate_chart_series(&series, &TimeSelector::range(Granularity::Quarterly));
    assert_eq!(quarters.len(), 1);
    assert_eq!(quarters[0].date, "2024Q1");
}

#[test]
fn active_dates_feed_heatmap() {
    let mut week = vec![json!(0); 168];
    // Monday 00:00 UTC
    week[0] = json!(40);
    week[1] = json!(4);
    let heatmap = decode_heatmap("u", json!({"2024-03": week})).unwrap();

    let period = heatmap.latest_period(Granularity::Monthly, 2024).unwrap();
    let raw = heatmap.raw(&period).unwrap();
    let grid = normalize_heatmap(raw, 8);

    assert_eq!(grid.cell(0, 8), Some(HeatCell::Intensity(10)));
    assert_eq!(grid.cell(0, 9), Some(HeatCell::Intensity(1)));
    assert_eq!(grid.cell(0, 0), Some(HeatCell::NoData));
}
