//! Dashboard views, user selections and the data each view renders.

use crate::content;
use crate::data::{
    ProcessorError, RatePoint, RateSort, TonnageSort, TypeRate, TypeTonnage, WasteProcessor,
    WasteTable,
};
use crate::stats::{CorrelationCalculator, CorrelationMatrix};
use serde::Serialize;

/// The five mutually exclusive pages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum View {
    #[default]
    Home,
    LineChart,
    BarChart,
    StackedBarChart,
    Heatmap,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Home,
        View::LineChart,
        View::BarChart,
        View::StackedBarChart,
        View::Heatmap,
    ];

    /// Chart views, in navigation order.
    pub const CHARTS: [View; 4] = [
        View::LineChart,
        View::BarChart,
        View::StackedBarChart,
        View::Heatmap,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::LineChart => "Line Chart",
            View::BarChart => "Bar Chart",
            View::StackedBarChart => "Stacked Bar Chart",
            View::Heatmap => "Heatmap",
        }
    }

    pub fn subheader(&self) -> &'static str {
        match self {
            View::Home => content::APP_TITLE,
            View::Heatmap => "Correlation Heatmap",
            other => other.label(),
        }
    }

    /// File name stem used for exports.
    pub fn file_stem(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::LineChart => "line_chart",
            View::BarChart => "bar_chart",
            View::StackedBarChart => "stacked_bar_chart",
            View::Heatmap => "correlation_heatmap",
        }
    }

    pub fn has_chart(&self) -> bool {
        !matches!(self, View::Home)
    }
}

/// Secondary selector state shared by the chart views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub waste_type: Option<String>,
    pub year: Option<i64>,
    pub rate_sort: RateSort,
    pub tonnage_sort: TonnageSort,
}

impl Selection {
    /// Fill unset or unknown choices with the first option the table offers.
    pub fn resolve(mut self, table: &WasteTable) -> Self {
        let waste_types = table.waste_types();
        if !self
            .waste_type
            .as_ref()
            .is_some_and(|wt| waste_types.contains(wt))
        {
            self.waste_type = waste_types.into_iter().next();
        }

        let years = table.years();
        if !self.year.is_some_and(|y| years.contains(&y)) {
            self.year = years.into_iter().next();
        }

        self
    }

    /// Fill only unset choices; explicit ones are kept even if the table
    /// has no rows for them.
    pub fn fill_unset(mut self, table: &WasteTable) -> Self {
        if self.waste_type.is_none() {
            self.waste_type = table.waste_types().into_iter().next();
        }
        if self.year.is_none() {
            self.year = table.years().into_iter().next();
        }
        self
    }
}

/// Transformed data behind one rendered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewData {
    Home,
    Line {
        waste_type: String,
        points: Vec<RatePoint>,
    },
    Bar {
        year: i64,
        sort: RateSort,
        rows: Vec<TypeRate>,
    },
    StackedBar {
        year: i64,
        sort: TonnageSort,
        rows: Vec<TypeTonnage>,
    },
    Heatmap {
        matrix: CorrelationMatrix,
    },
}

impl ViewData {
    /// Run the transform for `view` using the current selection.
    ///
    /// Choices missing from the selection are not filled in here; a waste
    /// type or year with no matching rows yields an empty view.
    pub fn build(
        table: &WasteTable,
        view: View,
        selection: &Selection,
    ) -> Result<Self, ProcessorError> {
        let data = match view {
            View::Home => ViewData::Home,
            View::LineChart => {
                let waste_type = selection.waste_type.clone().unwrap_or_default();
                let points = WasteProcessor::filter_by_waste_type(table, &waste_type)?;
                ViewData::Line { waste_type, points }
            }
            View::BarChart => {
                let year = selection.year.unwrap_or_default();
                let rows =
                    WasteProcessor::recycling_rate_by_type(table, year, selection.rate_sort)?;
                ViewData::Bar {
                    year,
                    sort: selection.rate_sort,
                    rows,
                }
            }
            View::StackedBarChart => {
                let year = selection.year.unwrap_or_default();
                let rows = WasteProcessor::tonnage_by_type(table, year, selection.tonnage_sort)?;
                ViewData::StackedBar {
                    year,
                    sort: selection.tonnage_sort,
                    rows,
                }
            }
            View::Heatmap => ViewData::Heatmap {
                matrix: CorrelationCalculator::compute(table)?,
            },
        };
        Ok(data)
    }

    pub fn view(&self) -> View {
        match self {
            ViewData::Home => View::Home,
            ViewData::Line { .. } => View::LineChart,
            ViewData::Bar { .. } => View::BarChart,
            ViewData::StackedBar { .. } => View::StackedBarChart,
            ViewData::Heatmap { .. } => View::Heatmap,
        }
    }

    /// Chart title with the current selection interpolated.
    pub fn title(&self) -> String {
        match self {
            ViewData::Home => content::APP_TITLE.to_string(),
            ViewData::Line { waste_type, .. } => {
                format!("Recycling Rate for {} Over Time", waste_type)
            }
            ViewData::Bar { year, .. } => {
                format!("Total Waste Generated by Waste Type in {}", year)
            }
            ViewData::StackedBar { year, .. } => {
                format!("Waste Disposal and Recycling by Waste Type in {}", year)
            }
            ViewData::Heatmap { .. } => "Correlation Heatmap".to_string(),
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            ViewData::Home => "",
            ViewData::Line { .. } => "Year",
            ViewData::Bar { .. } => "Recycling Rate",
            ViewData::StackedBar { .. } => "Quantity (tonne)",
            ViewData::Heatmap { .. } => "Variables",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ViewData::Home => "",
            ViewData::Line { .. } => "Recycling Rate",
            ViewData::Bar { .. } | ViewData::StackedBar { .. } => "Waste Type",
            ViewData::Heatmap { .. } => "Variables",
        }
    }

    pub fn description(&self) -> String {
        match self {
            ViewData::Home => content::DATA_DESCRIPTION.to_string(),
            ViewData::Line { .. } => content::LINE_DESCRIPTION.to_string(),
            ViewData::Bar { year, .. } => content::bar_description(*year),
            ViewData::StackedBar { .. } => content::STACKED_DESCRIPTION.to_string(),
            ViewData::Heatmap { .. } => content::HEATMAP_DESCRIPTION.to_string(),
        }
    }

    /// True when a chart view has nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ViewData::Home => false,
            ViewData::Line { points, .. } => points.is_empty(),
            ViewData::Bar { rows, .. } => rows.is_empty(),
            ViewData::StackedBar { rows, .. } => rows.is_empty(),
            ViewData::Heatmap { matrix } => matrix.is_empty(),
        }
    }

    /// Message shown in place of an empty chart.
    pub fn empty_message(&self) -> String {
        match self {
            ViewData::Line { waste_type, .. } if waste_type.is_empty() => {
                "No waste type selected.".to_string()
            }
            ViewData::Line { waste_type, .. } => {
                format!("No records found for waste type \"{}\".", waste_type)
            }
            ViewData::Bar { year, .. } | ViewData::StackedBar { year, .. } => {
                format!("No records found for year {}.", year)
            }
            ViewData::Heatmap { .. } => "The dataset has no numeric columns.".to_string(),
            ViewData::Home => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::sample_table;

    #[test]
    fn test_resolve_fills_first_options() {
        let table = sample_table();
        let selection = Selection::default().resolve(&table);
        assert_eq!(selection.waste_type.as_deref(), Some("Food"));
        assert_eq!(selection.year, Some(2017));
    }

    #[test]
    fn test_resolve_keeps_valid_choices_and_replaces_unknown_ones() {
        let table = sample_table();
        let selection = Selection {
            waste_type: Some("Plastics".to_string()),
            year: Some(1990),
            ..Default::default()
        }
        .resolve(&table);
        assert_eq!(selection.waste_type.as_deref(), Some("Plastics"));
        assert_eq!(selection.year, Some(2017));
    }

    #[test]
    fn test_fill_unset_keeps_explicit_unknown_choice() {
        let table = sample_table();
        let selection = Selection {
            year: Some(1990),
            ..Default::default()
        }
        .fill_unset(&table);
        assert_eq!(selection.waste_type.as_deref(), Some("Food"));
        assert_eq!(selection.year, Some(1990));
    }

    #[test]
    fn test_build_each_view() {
        let table = sample_table();
        let selection = Selection {
            year: Some(2016),
            ..Default::default()
        }
        .resolve(&table);

        for view in View::ALL {
            let data = ViewData::build(&table, view, &selection).unwrap();
            assert_eq!(data.view(), view);
            assert!(!data.is_empty(), "{:?} should have data", view);
        }
    }

    #[test]
    fn test_titles_interpolate_selection() {
        let table = sample_table();
        let selection = Selection {
            waste_type: Some("Plastics".to_string()),
            year: Some(2016),
            ..Default::default()
        };

        let line = ViewData::build(&table, View::LineChart, &selection).unwrap();
        assert_eq!(line.title(), "Recycling Rate for Plastics Over Time");
        assert_eq!(line.x_label(), "Year");

        let bar = ViewData::build(&table, View::BarChart, &selection).unwrap();
        assert_eq!(bar.title(), "Total Waste Generated by Waste Type in 2016");
        assert!(bar.description().contains("2016"));

        let stacked = ViewData::build(&table, View::StackedBarChart, &selection).unwrap();
        assert_eq!(
            stacked.title(),
            "Waste Disposal and Recycling by Waste Type in 2016"
        );
        assert_eq!(stacked.x_label(), "Quantity (tonne)");
    }

    #[test]
    fn test_empty_selection_reports_message() {
        let table = sample_table();
        let selection = Selection {
            waste_type: Some("Glass".to_string()),
            year: Some(1999),
            ..Default::default()
        };

        let line = ViewData::build(&table, View::LineChart, &selection).unwrap();
        assert!(line.is_empty());
        assert_eq!(line.empty_message(), "No records found for waste type \"Glass\".");

        let stacked = ViewData::build(&table, View::StackedBarChart, &selection).unwrap();
        assert!(stacked.is_empty());
        assert_eq!(stacked.empty_message(), "No records found for year 1999.");
    }

    #[test]
    fn test_view_data_serializes_with_view_tag() {
        let table = sample_table();
        let selection = Selection::default().resolve(&table);
        let data = ViewData::build(&table, View::BarChart, &selection).unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["view"], "bar");
        assert_eq!(json["year"], 2017);
        assert_eq!(json["sort"], "None");
        assert_eq!(json["rows"].as_array().unwrap().len(), 4);
    }
}
