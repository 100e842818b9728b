//! Static Chart Renderer
//! Draws the current view to a PNG with plotters.
//!
//! Layout follows the interactive charts: caption on top, axis descriptions
//! from the view, category axes on the left for the horizontal bar charts
//! and an annotated grid for the heatmap.

use crate::charts::palette::{self, Rgb};
use crate::dashboard::{View, ViewData};
use crate::data::{RatePoint, TonnageSort, TypeRate, TypeTonnage};
use crate::stats::CorrelationMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("The {0:?} view has no chart")]
    NoChart(View),
    #[error("Nothing to draw: {0}")]
    Empty(String),
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a chart view to a PNG file.
    pub fn render_to_file(
        data: &ViewData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        Self::check_drawable(data)?;

        let root = BitMapBackend::new(path, size).into_drawing_area();
        Self::draw(&root, data).map_err(|e| RenderError::Drawing(e.to_string()))?;
        root.present()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;

        info!(path = %path.display(), view = ?data.view(), "rendered static chart");
        Ok(())
    }

    /// Reject views that have nothing to put on a canvas.
    pub fn check_drawable(data: &ViewData) -> Result<(), RenderError> {
        if !data.view().has_chart() {
            return Err(RenderError::NoChart(data.view()));
        }
        if data.is_empty() {
            return Err(RenderError::Empty(data.empty_message()));
        }
        Ok(())
    }

    /// Largest value plus a 10% pad; 1.0 when nothing is positive.
    fn axis_upper(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, data: &ViewData) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let title = data.title();

        match data {
            ViewData::Home => Ok(()),
            ViewData::Line { points, .. } => Self::draw_line(root, &title, data, points),
            ViewData::Bar { rows, .. } => Self::draw_bar(root, &title, data, rows),
            ViewData::StackedBar { rows, sort, .. } => {
                Self::draw_stacked(root, &title, data, rows, *sort)
            }
            ViewData::Heatmap { matrix } => Self::draw_heatmap(root, &title, matrix),
        }
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        data: &ViewData,
        points: &[RatePoint],
    ) -> DrawResult<DB> {
        let x_min = points.iter().map(|p| p.year).min().unwrap_or(0);
        let x_max = points.iter().map(|p| p.year).max().unwrap_or(0);
        let (x_min, x_max) = if x_min == x_max {
            (x_min - 1, x_max + 1)
        } else {
            (x_min, x_max)
        };
        let y_min = points
            .iter()
            .map(|p| p.recycling_rate)
            .fold(0.0, f64::min);
        let y_max = Self::axis_upper(points.iter().map(|p| p.recycling_rate));

        let line_color = rgb(palette::LINE);
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(25)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(data.x_label())
            .y_desc(data.y_label())
            .x_labels((x_max - x_min + 1) as usize)
            .x_label_formatter(&|year| format!("{}", year))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style((FONT, 16))
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().map(|p| (p.year, p.recycling_rate)),
            line_color.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.year, p.recycling_rate), 4, line_color.filled())),
        )?;

        Ok(())
    }

    fn draw_bar<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        data: &ViewData,
        rows: &[TypeRate],
    ) -> DrawResult<DB> {
        let n = rows.len() as i32;
        let x_max = Self::axis_upper(rows.iter().map(|r| r.recycling_rate));
        let labels: Vec<String> = rows.iter().map(|r| r.waste_type.clone()).collect();
        let bar_color = rgb(palette::BAR);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(25)
            .x_label_area_size(60)
            .y_label_area_size(220)
            .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(data.x_label())
            .y_desc(data.y_label())
            .y_labels(rows.len())
            .y_label_formatter(&|v| Self::segment_label(&labels, v))
            .label_style((FONT, 16))
            .draw()?;

        chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i)),
                    (row.recycling_rate, SegmentValue::Exact(i + 1)),
                ],
                bar_color.filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))?;

        Ok(())
    }

    fn draw_stacked<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        data: &ViewData,
        rows: &[TypeTonnage],
        sort: TonnageSort,
    ) -> DrawResult<DB> {
        let n = rows.len() as i32;
        let x_max = Self::axis_upper(rows.iter().map(|r| r.total_waste));
        let labels: Vec<String> = rows.iter().map(|r| r.waste_type.clone()).collect();

        let disposed: (&str, RGBColor, fn(&TypeTonnage) -> f64) =
            ("Waste Disposed", rgb(palette::DISPOSED), |r| r.disposed);
        let recycled: (&str, RGBColor, fn(&TypeTonnage) -> f64) =
            ("Waste Recycled", rgb(palette::RECYCLED), |r| r.recycled);
        let segments = if sort.recycled_first() {
            [recycled, disposed]
        } else {
            [disposed, recycled]
        };

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(25)
            .x_label_area_size(60)
            .y_label_area_size(220)
            .build_cartesian_2d(0.0..x_max, (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(data.x_label())
            .y_desc(data.y_label())
            .y_labels(rows.len())
            .y_label_formatter(&|v| Self::segment_label(&labels, v))
            .x_label_formatter(&|v| format!("{:.0}", v))
            .label_style((FONT, 16))
            .draw()?;

        let mut offsets = vec![0.0; rows.len()];
        for (name, color, value) in segments {
            let bars: Vec<Rectangle<(f64, SegmentValue<i32>)>> = rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let start = offsets[i];
                    let end = start + value(row);
                    let i = i as i32;
                    let mut bar = Rectangle::new(
                        [
                            (start, SegmentValue::Exact(i)),
                            (end, SegmentValue::Exact(i + 1)),
                        ],
                        color.filled(),
                    );
                    bar.set_margin(6, 6, 0, 0);
                    bar
                })
                .collect();
            for (offset, row) in offsets.iter_mut().zip(rows) {
                *offset += value(row);
            }

            chart
                .draw_series(bars)?
                .label(name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.85))
            .border_style(&BLACK)
            .label_font((FONT, 16))
            .draw()?;

        Ok(())
    }

    fn draw_heatmap<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        matrix: &CorrelationMatrix,
    ) -> DrawResult<DB> {
        let n = matrix.len() as i32;
        let names = &matrix.columns;
        // Row 0 is drawn at the top, so the y axis is indexed in reverse
        let row_at = |y: i32| (n - 1 - y) as usize;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28))
            .margin(25)
            .x_label_area_size(70)
            .y_label_area_size(230)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Variables")
            .y_desc("Variables")
            .x_labels(names.len())
            .y_labels(names.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) if (0..n).contains(i) => {
                    names.get(row_at(*i)).cloned().unwrap_or_default()
                }
                _ => String::new(),
            })
            .label_style((FONT, 14))
            .draw()?;

        let cells: Vec<(i32, i32, f64)> = (0..n)
            .flat_map(|x| (0..n).map(move |y| (x, y)))
            .map(|(x, y)| (x, y, matrix.get(row_at(y), x as usize)))
            .collect();

        chart.draw_series(cells.iter().map(|&(x, y, value)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                rgb(palette::coolwarm(value)).filled(),
            )
        }))?;

        chart.draw_series(cells.iter().map(|&(x, y, value)| {
            let fill = palette::coolwarm(value);
            let annotation = if value.is_nan() {
                "n/a".to_string()
            } else {
                format!("{:.2}", value)
            };
            let style = (FONT, 18)
                .into_font()
                .color(&rgb(palette::contrast_text(fill)))
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                annotation,
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                style,
            )
        }))?;

        Ok(())
    }

    fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
        match value {
            SegmentValue::CenterOf(i) if *i >= 0 => {
                labels.get(*i as usize).cloned().unwrap_or_default()
            }
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Selection, ViewData};
    use crate::data::test_fixtures::sample_table;

    #[test]
    fn test_home_view_is_not_drawable() {
        let err = StaticChartRenderer::check_drawable(&ViewData::Home).unwrap_err();
        assert!(matches!(err, RenderError::NoChart(View::Home)));
    }

    #[test]
    fn test_empty_view_is_not_drawable() {
        let table = sample_table();
        let selection = Selection {
            year: Some(1999),
            ..Default::default()
        };
        let data = ViewData::build(&table, View::BarChart, &selection).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = StaticChartRenderer::render_to_file(&data, &path, (800, 600)).unwrap_err();

        assert!(matches!(err, RenderError::Empty(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_axis_upper_follows_data_scale() {
        let fractions = StaticChartRenderer::axis_upper([0.16, 0.51, 0.99].into_iter());
        assert!((fractions - 1.089).abs() < 1e-9);

        let percents = StaticChartRenderer::axis_upper([16.0, 99.0].into_iter());
        assert!((percents - 108.9).abs() < 1e-9);

        assert_eq!(StaticChartRenderer::axis_upper(std::iter::empty()), 1.0);
        assert_eq!(StaticChartRenderer::axis_upper([0.0, -2.0].into_iter()), 1.0);
    }

    #[test]
    fn test_segment_label() {
        let labels = vec!["Food".to_string(), "Plastics".to_string()];
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::CenterOf(1)),
            "Plastics"
        );
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::Exact(1)),
            ""
        );
        assert_eq!(
            StaticChartRenderer::segment_label(&labels, &SegmentValue::CenterOf(5)),
            ""
        );
    }
}
