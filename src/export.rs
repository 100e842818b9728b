//! Report Export Module
//! Writes chart PNGs and the transformed view data as JSON.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::dashboard::{Selection, View, ViewData};
use crate::data::{LoaderError, ProcessorError, WasteTable};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

const DATASET_FILE: &str = "dataset.json";

/// Files written by a headless export run.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<View>,
}

/// Exports views to disk.
pub struct ReportExporter;

impl ReportExporter {
    /// File name for a view's export, e.g. `line_chart_paper_cardboard.png`.
    pub fn file_name(data: &ViewData, extension: &str) -> String {
        let suffix = match data {
            ViewData::Line { waste_type, .. } => Some(Self::safe_name(waste_type)),
            ViewData::Bar { year, .. } | ViewData::StackedBar { year, .. } => {
                Some(year.to_string())
            }
            ViewData::Home | ViewData::Heatmap { .. } => None,
        };

        match suffix {
            Some(suffix) => format!("{}_{}.{}", data.view().file_stem(), suffix, extension),
            None => format!("{}.{}", data.view().file_stem(), extension),
        }
    }

    fn safe_name(name: &str) -> String {
        let mut safe = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_alphanumeric() {
                safe.extend(c.to_lowercase());
            } else if !safe.ends_with('_') {
                safe.push('_');
            }
        }
        safe.trim_matches('_').to_string()
    }

    /// Write the view's transformed data as pretty JSON.
    pub fn write_json(data: &ViewData, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, data)?;
        writer.flush()?;
        info!(path = %path.display(), view = ?data.view(), "exported view data");
        Ok(())
    }

    /// Write the cleaned table as a JSON array of records.
    pub fn write_records(table: &WasteTable, path: &Path) -> Result<(), ExportError> {
        let records = table.records()?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.flush()?;
        info!(path = %path.display(), records = records.len(), "exported cleaned dataset");
        Ok(())
    }

    /// Export every chart view for the given selection into `dir`.
    ///
    /// Views with an empty selection are skipped with a warning.
    pub fn export_all(
        table: &WasteTable,
        selection: &Selection,
        dir: &Path,
        size: (u32, u32),
    ) -> Result<ExportSummary, ExportError> {
        Self::export_with(table, selection, dir, |data, path| {
            StaticChartRenderer::render_to_file(data, path, size)
        })
    }

    fn export_with(
        table: &WasteTable,
        selection: &Selection,
        dir: &Path,
        mut render_png: impl FnMut(&ViewData, &Path) -> Result<(), RenderError>,
    ) -> Result<ExportSummary, ExportError> {
        fs::create_dir_all(dir)?;
        let mut summary = ExportSummary::default();

        let records_path = dir.join(DATASET_FILE);
        Self::write_records(table, &records_path)?;
        summary.written.push(records_path);

        for view in View::CHARTS {
            let data = ViewData::build(table, view, selection)?;
            if data.is_empty() {
                warn!(?view, reason = %data.empty_message(), "skipping empty view");
                summary.skipped.push(view);
                continue;
            }

            let png_path = dir.join(Self::file_name(&data, "png"));
            render_png(&data, &png_path)?;
            summary.written.push(png_path);

            let json_path = dir.join(Self::file_name(&data, "json"));
            Self::write_json(&data, &json_path)?;
            summary.written.push(json_path);
        }

        Ok(summary)
    }
}
