use crate::error::ChartError;
use analytics::AnalyticsReport;
use analytics::stats::percentile;
use configuration::ChartSettings;
use core_types::{Trip, UserType};
use itertools::Itertools;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

pub const TOP_STATIONS_CHART: &str = "bar_trips_per_station.png";
pub const MONTHLY_TREND_CHART: &str = "line_monthly_trip_trend.png";
pub const DURATION_HISTOGRAM_CHART: &str = "hist_trip_duration.png";
pub const DURATION_BY_USER_TYPE_CHART: &str = "box_duration_by_user_type.png";

const STATION_BLUE: RGBColor = RGBColor(0x2E, 0x86, 0xAB);
const TREND_ORANGE: RGBColor = RGBColor(0xF1, 0x8F, 0x01);
const HISTOGRAM_GREEN: RGBColor = RGBColor(0x4C, 0xAF, 0x50);
const GRID_GREY: RGBColor = RGBColor(0xDD, 0xDD, 0xDD);
const GRID_LINES: u32 = 5;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult<T = ()> = Result<T, Box<dyn Error + Send + Sync>>;

/// Equal-width bins over the range of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

/// Bins the finite values of `values` into `bins` equal-width bins spanning their
/// minimum to their maximum. The maximum falls into the last bin.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let mut counts = vec![0; bins];
    let finite = || values.iter().copied().filter(|v| v.is_finite());

    let Some((min, max)) = finite().minmax().into_option() else {
        return Histogram {
            start: 0.0,
            bin_width: 1.0,
            counts,
        };
    };
    let bin_width = if max > min {
        (max - min) / bins as f64
    } else {
        1.0
    };

    for value in finite() {
        let index = (((value - min) / bin_width) as usize).min(bins - 1);
        counts[index] += 1;
    }

    Histogram {
        start: min,
        bin_width,
        counts,
    }
}

/// Renders the four report charts as PNG files into `settings.output_dir`,
/// creating it if needed, and returns the written paths.
///
/// The charts carry no text; their order follows the report rankings, so the
/// matching CSV tables label them.
pub fn render_charts(
    report: &AnalyticsReport,
    trips: &[Trip],
    settings: &ChartSettings,
) -> Result<Vec<PathBuf>, ChartError> {
    let dir = &settings.output_dir;
    fs::create_dir_all(dir).map_err(|source| ChartError::Io {
        path: dir.clone(),
        source,
    })?;

    let station_counts: Vec<f64> = report
        .top_start_stations
        .iter()
        .map(|e| e.count as f64)
        .collect();
    let monthly_counts: Vec<f64> = report
        .monthly_trend
        .months
        .iter()
        .map(|e| e.count as f64)
        .collect();
    let durations: Vec<f64> = trips
        .iter()
        .filter_map(|t| t.duration_minutes.to_f64())
        .collect();
    let bin_counts: Vec<f64> = histogram(&durations, settings.histogram_bins)
        .counts
        .into_iter()
        .map(|c| c as f64)
        .collect();
    let boxes = duration_boxes(trips);

    let written = vec![
        render(settings, TOP_STATIONS_CHART, |area| {
            draw_bars(area, &station_counts, STATION_BLUE)
        })?,
        render(settings, MONTHLY_TREND_CHART, |area| {
            draw_trend(area, &monthly_counts)
        })?,
        render(settings, DURATION_HISTOGRAM_CHART, |area| {
            draw_bars(area, &bin_counts, HISTOGRAM_GREEN)
        })?,
        render(settings, DURATION_BY_USER_TYPE_CHART, |area| {
            draw_boxes(area, &boxes)
        })?,
    ];

    tracing::info!(directory = %dir.display(), files = written.len(), "rendered charts");
    Ok(written)
}

fn render(
    settings: &ChartSettings,
    file: &str,
    draw: impl FnOnce(&Area<'_>) -> DrawResult,
) -> Result<PathBuf, ChartError> {
    let path = settings.output_dir.join(file);

    let area = BitMapBackend::new(&path, (settings.width, settings.height)).into_drawing_area();
    let painted = paint(&area, draw);
    drop(area);

    painted.map_err(|source| ChartError::Render {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "rendered chart");
    Ok(path)
}

fn paint(area: &Area<'_>, draw: impl FnOnce(&Area<'_>) -> DrawResult) -> DrawResult {
    area.fill(&WHITE)?;
    draw(area)?;
    area.present()?;
    Ok(())
}

/// A chart over `[0, x_max] x [0, y_max]` with axes and horizontal grid lines.
/// Item `i` of a series occupies the unit slot `[i, i + 1]` on the x axis.
fn frame<'a, 'b>(area: &'a Area<'b>, x_max: f64, y_max: f64) -> DrawResult<Chart<'a, 'b>> {
    let mut chart = ChartBuilder::on(area)
        .margin(30)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)?;

    let step = y_max / f64::from(GRID_LINES);
    chart.draw_series((1..=GRID_LINES).map(|i| {
        let y = step * f64::from(i);
        PathElement::new(vec![(0.0, y), (x_max, y)], GRID_GREY.stroke_width(1))
    }))?;
    chart.draw_series([
        PathElement::new(vec![(0.0, 0.0), (x_max, 0.0)], BLACK.stroke_width(2)),
        PathElement::new(vec![(0.0, 0.0), (0.0, y_max)], BLACK.stroke_width(2)),
    ])?;
    Ok(chart)
}

fn draw_bars(area: &Area<'_>, values: &[f64], colour: RGBColor) -> DrawResult {
    let mut chart = frame(area, slots(values.len()), headroom(values.iter().copied()))?;
    chart.draw_series(values.iter().enumerate().map(|(i, &value)| {
        let x = i as f64;
        Rectangle::new([(x + 0.1, 0.0), (x + 0.9, value)], colour.filled())
    }))?;
    Ok(())
}

fn draw_trend(area: &Area<'_>, counts: &[f64]) -> DrawResult {
    let mut chart = frame(area, slots(counts.len()), headroom(counts.iter().copied()))?;
    let points: Vec<(f64, f64)> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| (i as f64 + 0.5, count))
        .collect();

    chart.draw_series(std::iter::once(PathElement::new(
        points.clone(),
        TREND_ORANGE.stroke_width(3),
    )))?;
    chart.draw_series(
        points
            .into_iter()
            .map(|point| Circle::new(point, 5, TREND_ORANGE.filled())),
    )?;
    Ok(())
}

/// Five-number summary of one box.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BoxStats {
    low: f64,
    q1: f64,
    median: f64,
    q3: f64,
    high: f64,
}

impl BoxStats {
    fn of(values: &[f64]) -> Option<Self> {
        let (low, high) = values.iter().copied().minmax().into_option()?;
        Some(Self {
            low,
            q1: percentile(values, 25.0)?,
            median: percentile(values, 50.0)?,
            q3: percentile(values, 75.0)?,
            high,
        })
    }
}

fn duration_boxes(trips: &[Trip]) -> Vec<(UserType, BoxStats)> {
    trips
        .iter()
        .filter_map(|t| Some((t.user_type, t.duration_minutes.to_f64()?)))
        .into_group_map()
        .into_iter()
        .sorted_by_key(|(user_type, _)| *user_type)
        .filter_map(|(user_type, durations)| Some((user_type, BoxStats::of(&durations)?)))
        .collect()
}

fn box_colour(user_type: UserType) -> RGBColor {
    match user_type {
        UserType::Member => RGBColor(0x03, 0xA9, 0xF4),
        UserType::Casual => RGBColor(0x9C, 0x27, 0xB0),
        UserType::Unknown => RGBColor(0x9E, 0x9E, 0x9E),
    }
}

fn draw_boxes(area: &Area<'_>, boxes: &[(UserType, BoxStats)]) -> DrawResult {
    let mut chart = frame(area, slots(boxes.len()), headroom(boxes.iter().map(|(_, b)| b.high)))?;
    let line = BLACK.stroke_width(2);

    for (i, (user_type, stats)) in boxes.iter().enumerate() {
        let x = i as f64;
        let (left, centre, right) = (x + 0.25, x + 0.5, x + 0.75);

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            box_colour(*user_type).mix(0.55).filled(),
        )))?;
        chart.draw_series([
            PathElement::new(vec![(left, stats.median), (right, stats.median)], line),
            PathElement::new(vec![(centre, stats.low), (centre, stats.q1)], line),
            PathElement::new(vec![(centre, stats.q3), (centre, stats.high)], line),
            PathElement::new(vec![(x + 0.4, stats.low), (x + 0.6, stats.low)], line),
            PathElement::new(vec![(x + 0.4, stats.high), (x + 0.6, stats.high)], line),
        ])?;
    }
    Ok(())
}

fn slots(items: usize) -> f64 {
    items.max(1) as f64
}

/// Top of the y axis: 10% above the largest value, or 1 for an empty chart.
fn headroom(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_spans_min_to_max() {
        let binned = histogram(&[0.0, 1.0, 2.5, 5.0, 10.0], 4);
        assert_eq!(binned.start, 0.0);
        assert_eq!(binned.bin_width, 2.5);
        // 2.5 opens the second bin; the maximum closes the last one.
        assert_eq!(binned.counts, vec![2, 1, 1, 1]);
    }

    #[test]
    fn histogram_of_constant_or_empty_sample() {
        let constant = histogram(&[7.0, 7.0, 7.0], 3);
        assert_eq!(constant.counts, vec![3, 0, 0]);
        assert_eq!(constant.start, 7.0);

        let empty = histogram(&[f64::NAN], 2);
        assert_eq!(empty.counts, vec![0, 0]);
        assert_eq!(histogram(&[1.0], 0).counts, vec![1]);
    }

    #[test]
    fn box_stats_use_interpolated_quartiles() {
        let stats = BoxStats::of(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(
            stats,
            BoxStats {
                low: 1.0,
                q1: 2.0,
                median: 3.0,
                q3: 4.0,
                high: 5.0,
            }
        );
        assert_eq!(BoxStats::of(&[]), None);
    }

    #[test]
    fn headroom_never_collapses_the_axis() {
        assert_eq!(headroom(std::iter::empty()), 1.0);
        assert_eq!(headroom([0.0, 0.0].into_iter()), 1.0);
        assert!((headroom([10.0, 4.0].into_iter()) - 11.0).abs() < 1e-9);
    }
}
