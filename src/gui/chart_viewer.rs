//! Chart Viewer Widget
//! Central panel showing the home page or the active chart with its description.

use crate::charts::{color, palette, ChartPlotter};
use crate::content;
use crate::dashboard::ViewData;
use egui::{Color32, RichText, ScrollArea};

/// What the central panel currently displays.
#[derive(Debug, Default)]
enum ViewerState {
    #[default]
    Loading,
    Failed(String),
    Ready(ViewData),
}

/// Central content area for the selected view.
#[derive(Default)]
pub struct ChartViewer {
    state: ViewerState,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view_data(&mut self, data: ViewData) {
        self.state = ViewerState::Ready(data);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = ViewerState::Failed(message.into());
    }

    /// Data behind the current chart, if one is shown.
    pub fn view_data(&self) -> Option<&ViewData> {
        match &self.state {
            ViewerState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.state {
            ViewerState::Ready(ViewData::Home) => Self::draw_home(ui),
            ViewerState::Ready(data) => Self::draw_chart_page(ui, data),
            ViewerState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("Loading data...").size(20.0));
                });
            }
            ViewerState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {}", message))
                            .size(18.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
        }
    }

    fn draw_home(ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(10.0);
                ui.label(
                    RichText::new(content::APP_TITLE)
                        .size(28.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.add_space(15.0);

                Self::content_frame(ui, |ui| {
                    Self::section_header(ui, "Problem Statement");
                    ui.label(RichText::new(content::PROBLEM_STATEMENT).size(14.0));

                    ui.add_space(12.0);
                    Self::section_header(ui, "Data Description");
                    ui.label(RichText::new(content::DATA_DESCRIPTION).size(14.0));

                    ui.add_space(12.0);
                    Self::section_header(ui, "Objectives");
                    for objective in content::OBJECTIVES {
                        ui.label(RichText::new(objective).size(14.0));
                    }
                });
            });
    }

    fn draw_chart_page(ui: &mut egui::Ui, data: &ViewData) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(10.0);
                ui.label(
                    RichText::new(data.view().subheader())
                        .size(24.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.add_space(10.0);

                Self::content_frame(ui, |ui| {
                    ui.label(RichText::new(data.description()).size(14.0));
                });

                ui.add_space(12.0);

                Self::content_frame(ui, |ui| {
                    if data.is_empty() {
                        ui.add_space(40.0);
                        ui.vertical_centered(|ui| {
                            ui.label(
                                RichText::new(data.empty_message())
                                    .size(16.0)
                                    .color(Color32::LIGHT_GRAY),
                            );
                        });
                        ui.add_space(40.0);
                        return;
                    }

                    ui.label(RichText::new(data.title()).size(18.0).strong());
                    ui.add_space(8.0);

                    match data {
                        ViewData::Line { waste_type, points } => {
                            ChartPlotter::draw_line_chart(ui, waste_type, points)
                        }
                        ViewData::Bar { year, rows, .. } => {
                            ChartPlotter::draw_bar_chart(ui, *year, rows)
                        }
                        ViewData::StackedBar { year, sort, rows } => {
                            ChartPlotter::draw_stacked_bar_chart(ui, *year, rows, *sort)
                        }
                        ViewData::Heatmap { matrix } => ChartPlotter::draw_heatmap(ui, matrix),
                        ViewData::Home => {}
                    }
                });
            });
    }

    fn section_header(ui: &mut egui::Ui, text: &str) {
        ui.label(
            RichText::new(text)
                .size(18.0)
                .strong()
                .color(color(palette::BACKGROUND_LIGHT)),
        );
        ui.add_space(4.0);
    }

    fn content_frame(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .fill(color(palette::CONTENT))
            .rounding(8.0)
            .inner_margin(14.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                add_contents(ui);
            });
    }
}
