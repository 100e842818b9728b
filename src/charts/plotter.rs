//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::palette::{self, Rgb};
use crate::data::{RatePoint, TonnageSort, TypeRate, TypeTonnage};
use crate::stats::CorrelationMatrix;
use egui::{Align2, Color32, FontId, Rect, Sense, Stroke};
use egui_plot::{Bar, BarChart, GridInput, GridMark, Legend, Line, Plot, PlotPoints, Points};

const CHART_HEIGHT: f32 = 420.0;
const HEATMAP_LABEL_WIDTH: f32 = 200.0;
const HEATMAP_LABEL_HEIGHT: f32 = 60.0;

pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// One grid mark per category index so every label is drawn.
    fn category_marks(count: usize) -> impl Fn(GridInput) -> Vec<GridMark> + 'static {
        move |_input| {
            (0..count)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect()
        }
    }

    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Recycling rate against year for one waste type.
    pub fn draw_line_chart(ui: &mut egui::Ui, waste_type: &str, points: &[RatePoint]) {
        let line_color = color(palette::LINE);
        let years: Vec<i64> = points.iter().map(|p| p.year).collect();
        let coords: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p.year as f64, p.recycling_rate])
            .collect();

        Plot::new(format!("line_{}", waste_type))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Year")
            .y_axis_label("Recycling Rate")
            .allow_scroll(false)
            .include_y(0.0)
            .x_grid_spacer(move |_input| {
                years
                    .iter()
                    .map(|&year| GridMark {
                        value: year as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| format!("{}", mark.value.round() as i64))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    String::new()
                } else {
                    format!("{}\nYear: {:.0}\nRecycling Rate: {:.2}", name, value.x, value.y)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(coords.iter().copied()))
                        .color(line_color)
                        .width(2.0)
                        .name(waste_type),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(coords.iter().copied()))
                        .radius(4.0)
                        .color(line_color)
                        .name(waste_type),
                );
            });
    }

    /// Horizontal bars of summed recycling rate per waste type.
    pub fn draw_bar_chart(ui: &mut egui::Ui, year: i64, rows: &[TypeRate]) {
        let labels: Vec<String> = rows.iter().map(|r| r.waste_type.clone()).collect();
        let bar_color = color(palette::BAR);

        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.recycling_rate)
                    .name(&row.waste_type)
                    .fill(bar_color)
                    .stroke(Stroke::new(1.0, bar_color))
            })
            .collect();

        let chart = BarChart::new(bars)
            .name("Recycling Rate")
            .color(bar_color)
            .width(0.7)
            .horizontal()
            .element_formatter(Box::new(|bar, _chart| {
                format!("{}\nRecycling Rate: {:.2}", bar.name, bar.value)
            }));

        Plot::new(format!("bar_{}", year))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Recycling Rate")
            .y_axis_label("Waste Type")
            .allow_scroll(false)
            .include_x(0.0)
            .y_grid_spacer(Self::category_marks(labels.len()))
            .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
    }

    /// Disposed and recycled tonnage stacked per waste type.
    pub fn draw_stacked_bar_chart(
        ui: &mut egui::Ui,
        year: i64,
        rows: &[TypeTonnage],
        sort: TonnageSort,
    ) {
        let labels: Vec<String> = rows.iter().map(|r| r.waste_type.clone()).collect();

        let segment = |name: &str, rgb: Rgb, value: fn(&TypeTonnage) -> f64| {
            let fill = color(rgb);
            let bars: Vec<Bar> = rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    Bar::new(i as f64, value(row))
                        .name(&row.waste_type)
                        .fill(fill)
                })
                .collect();
            let series = name.to_string();
            BarChart::new(bars)
                .name(name)
                .color(fill)
                .width(0.7)
                .horizontal()
                .element_formatter(Box::new(move |bar, _chart| {
                    format!("{}\n{}: {:.0} tonne", bar.name, series, bar.value)
                }))
        };

        let disposed = segment("Waste Disposed", palette::DISPOSED, |r| r.disposed);
        let recycled = segment("Waste Recycled", palette::RECYCLED, |r| r.recycled);
        let (first, second) = if sort.recycled_first() {
            (recycled, disposed)
        } else {
            (disposed, recycled)
        };
        let second = second.stack_on(&[&first]);

        Plot::new(format!("stacked_{}", year))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Quantity (tonne)")
            .y_axis_label("Waste Type")
            .allow_scroll(false)
            .include_x(0.0)
            .y_grid_spacer(Self::category_marks(labels.len()))
            .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(first);
                plot_ui.bar_chart(second);
            });
    }

    /// Annotated correlation matrix painted as a grid of cells.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        let n = matrix.len();
        if n == 0 {
            return;
        }

        let text_color = ui.visuals().text_color();
        let grid_width = (ui.available_width() - HEATMAP_LABEL_WIDTH).max(120.0);
        let cell = (grid_width / n as f32).clamp(48.0, 130.0);
        let size = egui::vec2(
            HEATMAP_LABEL_WIDTH + cell * n as f32,
            cell * n as f32 + HEATMAP_LABEL_HEIGHT,
        );

        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min + egui::vec2(HEATMAP_LABEL_WIDTH, 0.0);
        let cell_rect = |row: usize, col: usize| {
            Rect::from_min_size(
                origin + egui::vec2(col as f32 * cell, row as f32 * cell),
                egui::vec2(cell, cell),
            )
        };

        for (row, name) in matrix.columns.iter().enumerate() {
            painter.text(
                egui::pos2(origin.x - 8.0, origin.y + (row as f32 + 0.5) * cell),
                Align2::RIGHT_CENTER,
                name,
                FontId::proportional(12.0),
                text_color,
            );

            for col in 0..n {
                let value = matrix.get(row, col);
                let fill = palette::coolwarm(value);
                let rect = cell_rect(row, col);
                painter.rect_filled(rect, 0.0, color(fill));
                painter.rect_stroke(rect, 0.0, Stroke::new(0.5, Color32::from_gray(60)));

                let annotation = if value.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{:.2}", value)
                };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    annotation,
                    FontId::proportional(13.0),
                    color(palette::contrast_text(fill)),
                );
            }
        }

        // Column labels under the grid, alternating rows so long names don't collide
        for (col, name) in matrix.columns.iter().enumerate() {
            let offset = if col % 2 == 0 { 14.0 } else { 34.0 };
            painter.text(
                egui::pos2(
                    origin.x + (col as f32 + 0.5) * cell,
                    origin.y + n as f32 * cell + offset,
                ),
                Align2::CENTER_CENTER,
                name,
                FontId::proportional(11.0),
                text_color,
            );
        }

        let hovered = response.hover_pos().and_then(|pos| {
            let rel = pos - origin;
            if rel.x < 0.0 || rel.y < 0.0 {
                return None;
            }
            let (row, col) = ((rel.y / cell) as usize, (rel.x / cell) as usize);
            if row >= n || col >= n {
                return None;
            }
            Some(format!(
                "{} vs {}\nr = {:.4}",
                matrix.columns[row],
                matrix.columns[col],
                matrix.get(row, col)
            ))
        });

        if let Some(text) = hovered {
            response.on_hover_text_at_pointer(text);
        }

        ui.add_space(8.0);
        Self::draw_colorbar(ui);
    }

    /// Horizontal coolwarm legend from -1 to 1.
    fn draw_colorbar(ui: &mut egui::Ui) {
        let text_color = ui.visuals().text_color();
        let (response, painter) =
            ui.allocate_painter(egui::vec2(320.0, 36.0), Sense::hover());
        let bar = Rect::from_min_size(
            response.rect.min + egui::vec2(HEATMAP_LABEL_WIDTH * 0.2, 0.0),
            egui::vec2(240.0, 14.0),
        );

        let steps = 60;
        let step_width = bar.width() / steps as f32;
        for i in 0..steps {
            let value = -1.0 + 2.0 * (i as f64 + 0.5) / steps as f64;
            let rect = Rect::from_min_size(
                bar.min + egui::vec2(i as f32 * step_width, 0.0),
                egui::vec2(step_width + 0.5, bar.height()),
            );
            painter.rect_filled(rect, 0.0, color(palette::coolwarm(value)));
        }

        for (label, x) in [("-1", bar.left()), ("0", bar.center().x), ("1", bar.right())] {
            painter.text(
                egui::pos2(x, bar.bottom() + 10.0),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(11.0),
                text_color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_integer_marks() {
        let labels = vec!["Food".to_string(), "Plastics".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 0.0), "Food");
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "Plastics");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, 2.0), "");
        assert_eq!(ChartPlotter::category_label(&labels, -1.0), "");
    }
}
