//! Waste Dashboard Main Application
//! Main window with the navigation sidebar and the view panel.

use crate::charts::{color, palette, StaticChartRenderer};
use crate::config::Config;
use crate::dashboard::{Selection, ViewData};
use crate::data::{WasteLoader, WasteTable};
use crate::export::ReportExporter;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{debug, error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete(WasteTable),
    Error(String),
}

/// Main application window.
pub struct WasteDashboardApp {
    config: Config,
    table: Option<WasteTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl WasteDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, selection: Selection) -> Self {
        Self::apply_theme(&cc.egui_ctx);

        let mut control_panel = ControlPanel::new();
        control_panel.selection = selection;

        let mut app = Self {
            config,
            table: None,
            control_panel,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        let csv_path = app.config.data.csv_path.clone();
        app.start_loading(csv_path);
        app
    }

    fn apply_theme(ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = color(palette::BACKGROUND_DARK);
        visuals.window_fill = color(palette::BACKGROUND_DARK);
        visuals.extreme_bg_color = color(palette::CONTENT);
        visuals.selection.bg_fill = color(palette::RECYCLED).gamma_multiply(0.6);
        ctx.set_visuals(visuals);
    }

    /// Load the dataset once in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        info!(path = %path.display(), "loading dataset");
        self.control_panel.set_progress(5.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(20.0, "Reading CSV file...".to_string()));

            match WasteLoader::load_csv(&path) {
                Ok(table) => {
                    let _ = tx.send(LoadResult::Complete(table));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(table) => {
                        let waste_types = table.waste_types();
                        let years = table.years();
                        info!(
                            rows = table.height(),
                            waste_types = waste_types.len(),
                            years = years.len(),
                            "dataset loaded"
                        );

                        self.control_panel.selection =
                            self.control_panel.selection.clone().resolve(&table);
                        self.control_panel.update_choices(waste_types, years);
                        let source = table
                            .source()
                            .map(Self::display_name)
                            .unwrap_or_else(|| "dataset".to_string());
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Loaded {} rows, {} columns from {}",
                                table.height(),
                                table.columns().len(),
                                source
                            ),
                        );
                        self.table = Some(table);
                        self.refresh_view();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        error!(error = %message, "failed to load dataset");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", message));
                        self.chart_viewer
                            .set_error(format!("Could not load the dataset: {}", message));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute the active view from the loaded table and the current selection.
    fn refresh_view(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        let view = self.control_panel.view;
        match ViewData::build(table, view, &self.control_panel.selection) {
            Ok(data) => {
                debug!(?view, empty = data.is_empty(), "view rebuilt");
                self.control_panel.export_enabled = view.has_chart() && !data.is_empty();
                self.chart_viewer.set_view_data(data);
            }
            Err(e) => {
                error!(?view, error = %e, "failed to build view");
                self.control_panel.export_enabled = false;
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    fn pick_save_path(data: &ViewData, label: &str, extension: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(label, &[extension])
            .set_file_name(ReportExporter::file_name(data, extension))
            .save_file()
    }

    /// Handle PNG export of the current chart
    fn handle_export_png(&mut self) {
        let Some(data) = self.chart_viewer.view_data() else {
            return;
        };

        let Some(path) = Self::pick_save_path(data, "PNG Image", "png") else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering chart...");

        match StaticChartRenderer::render_to_file(data, &path, self.config.export.size()) {
            Ok(()) => {
                info!(path = %path.display(), "chart exported");
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", Self::display_name(&path)));
                if self.config.export.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!(path = %path.display(), error = %e, "could not open exported chart");
                    }
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "chart export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Handle JSON export of the current view data
    fn handle_export_json(&mut self) {
        let Some(data) = self.chart_viewer.view_data() else {
            return;
        };

        let Some(path) = Self::pick_save_path(data, "JSON", "json") else {
            return;
        };

        match ReportExporter::write_json(data, &path) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", Self::display_name(&path)));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "data export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl eframe::App for WasteDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Navigation
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style())
                    .fill(color(palette::BACKGROUND_LIGHT).gamma_multiply(0.35)),
            )
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Active view
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
