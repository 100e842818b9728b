//! Control Panel Widget
//! Left side panel with navigation, per-view selectors and export buttons.

use crate::dashboard::{Selection, View};
use crate::data::{RateSort, TonnageSort};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel with the view selector and its secondary selectors.
pub struct ControlPanel {
    pub view: View,
    pub selection: Selection,
    pub waste_types: Vec<String>,
    pub years: Vec<i64>,
    pub progress: f32,
    pub status: String,
    pub data_ready: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            view: View::Home,
            selection: Selection::default(),
            waste_types: Vec::new(),
            years: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            data_ready: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the selectors from the loaded table.
    pub fn update_choices(&mut self, waste_types: Vec<String>, years: Vec<i64>) {
        self.waste_types = waste_types;
        self.years = years;
        self.data_ready = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("♻ Waste Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(0x69, 0xCC, 0xF7)),
            );
            ui.label(
                RichText::new("Singapore 2003-2017")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        let label_width = 110.0;
        let combo_width = 170.0;

        // ===== Navigation =====
        ui.label(RichText::new("🧭 Navigate").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("navigate")
            .width(label_width + combo_width)
            .selected_text(self.view.label())
            .show_ui(ui, |ui| {
                for view in View::ALL {
                    if ui
                        .selectable_label(self.view == view, view.label())
                        .clicked()
                        && self.view != view
                    {
                        self.view = view;
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Options =====
        if self.view.has_chart() && self.view != View::Heatmap {
            ui.label(RichText::new("🔧 Options").size(14.0).strong());
            ui.add_space(8.0);

            ui.add_enabled_ui(self.data_ready, |ui| match self.view {
                View::LineChart => {
                    if self.waste_type_selector(ui, label_width, combo_width) {
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
                View::BarChart => {
                    let year_changed = self.year_selector(ui, label_width, combo_width);
                    ui.add_space(5.0);
                    let sort_changed = Self::sort_selector(
                        ui,
                        "rate_sort",
                        label_width,
                        combo_width,
                        &mut self.selection.rate_sort,
                        &RateSort::ALL,
                        RateSort::label,
                    );
                    if year_changed || sort_changed {
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
                View::StackedBarChart => {
                    let year_changed = self.year_selector(ui, label_width, combo_width);
                    ui.add_space(5.0);
                    let sort_changed = Self::sort_selector(
                        ui,
                        "tonnage_sort",
                        label_width,
                        combo_width,
                        &mut self.selection.tonnage_sort,
                        &TonnageSort::ALL,
                        TonnageSort::label,
                    );
                    if year_changed || sort_changed {
                        action = ControlPanelAction::SelectionChanged;
                    }
                }
                View::Home | View::Heatmap => {}
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Action Buttons =====
        if self.view.has_chart() {
            ui.vertical_centered(|ui| {
                ui.add_enabled_ui(self.export_enabled, |ui| {
                    let png_button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                    if ui.add(png_button).clicked() {
                        action = ControlPanelAction::ExportPng;
                    }

                    ui.add_space(6.0);

                    let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                    if ui.add(json_button).clicked() {
                        action = ControlPanelAction::ExportJson;
                    }
                });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn waste_type_selector(&mut self, ui: &mut egui::Ui, label_width: f32, combo_width: f32) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Waste Type:"));
            ComboBox::from_id_salt("waste_type")
                .width(combo_width)
                .selected_text(self.selection.waste_type.as_deref().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for waste_type in &self.waste_types {
                        let selected = self.selection.waste_type.as_ref() == Some(waste_type);
                        if ui.selectable_label(selected, waste_type).clicked() && !selected {
                            self.selection.waste_type = Some(waste_type.clone());
                            changed = true;
                        }
                    }
                });
        });
        changed
    }

    fn year_selector(&mut self, ui: &mut egui::Ui, label_width: f32, combo_width: f32) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Year:"));
            ComboBox::from_id_salt("year")
                .width(combo_width)
                .selected_text(
                    self.selection
                        .year
                        .map(|y| y.to_string())
                        .unwrap_or_default(),
                )
                .show_ui(ui, |ui| {
                    for &year in &self.years {
                        let selected = self.selection.year == Some(year);
                        if ui.selectable_label(selected, year.to_string()).clicked() && !selected {
                            self.selection.year = Some(year);
                            changed = true;
                        }
                    }
                });
        });
        changed
    }

    fn sort_selector<T: Copy + PartialEq>(
        ui: &mut egui::Ui,
        id: &str,
        label_width: f32,
        combo_width: f32,
        current: &mut T,
        options: &[T],
        label: fn(&T) -> &'static str,
    ) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Sort By:"));
            ComboBox::from_id_salt(id)
                .width(combo_width)
                .selected_text(label(current))
                .show_ui(ui, |ui| {
                    for option in options {
                        let selected = current == option;
                        if ui.selectable_label(selected, label(option)).clicked() && !selected {
                            *current = *option;
                            changed = true;
                        }
                    }
                });
        });
        changed
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportPng,
    ExportJson,
}
