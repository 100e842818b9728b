//! Static page text shown alongside each view.

pub const APP_TITLE: &str = "SINGAPORE WASTE MANAGEMENT ANALYSIS";

pub const PROBLEM_STATEMENT: &str = "The dataset attempts to address the issue of waste management in Singapore. Despite Singapore's well-developed waste management system, there are continuous worries about garbage generation, recycling rates, and sustainability. Therefore, the concern of this issue is that there is a lack of efficient resource allocation in waste management. If this issue continued, there will be increasing in environmental pollution as it may result in inadequate waste collection and disposal infrastructure.";

pub const DATA_DESCRIPTION: &str = "The Singapore Waste Management Analysis dataset is a comprehensive compilation of information about Singapore's waste management practices and statistics. It offers useful insights into numerous areas of waste generation, disposal, recycling, and overall waste management practices used in the country. The collection contains a wide range of data acquired from a variety of sources, including government agencies, environmental organizations, and research institutes. The dataset contains information on many sorts of garbage, such as food, paper or cardboard, plastics, Construction & Demolition (C&D), and horticultural waste. It includes information of the waste disposed, total waste recycled, total waste generated, recycling rate for each type of waste.";

pub const OBJECTIVES: [&str; 3] = [
    "1. Determine waste type that generates more total waste",
    "2. To determine the relationship between waste type and recycling rate",
    "3. To determine the relationship between recycling rate over years",
];

pub const LINE_DESCRIPTION: &str = "The line chart demonstrates the recycling rate over time for a specific waste type selected from the sidebar. It plots the recycling rate of every matching row against its year. This visualization helps track the trend and changes in recycling rates for the chosen waste type.";

pub fn bar_description(year: i64) -> String {
    format!(
        "The bar chart showcases the recycling rate by waste type in the year {year}. \
         It groups the rows of that year by waste type and sums the recycling rates. \
         This bar chart allows for easy comparison of the recycling rates across different \
         waste types, providing an overview of waste management in {year}."
    )
}

pub const STACKED_DESCRIPTION: &str = "The stacked bar chart represents waste disposal and recycling quantities by waste type. It sums the waste disposed of and recycled for each waste type and visualizes the relative proportions of waste disposal and recycling. Each bar is stacked to show the contribution of waste disposed of and waste recycled within each waste type. This visualization enables a comprehensive understanding of waste management practices across various waste types.";

pub const HEATMAP_DESCRIPTION: &str = "The correlation heatmap provides an overview of the correlations between different numeric variables in the dataset. It calculates the correlation coefficients between the numeric columns of the original dataset. The heatmap is color-coded to represent the strength and direction of the correlations. It helps identify relationships between variables, highlighting which factors might be positively or negatively correlated. This visualization aids in understanding the interdependencies among different waste management variables.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objectives_carry_their_own_numbering() {
        for (i, objective) in OBJECTIVES.iter().enumerate() {
            let prefix = format!("{}. ", i + 1);
            let rest = objective.strip_prefix(&prefix).unwrap();
            assert!(
                !rest.starts_with(|c: char| c.is_ascii_digit()),
                "objective {} is numbered twice",
                i + 1
            );
        }
    }

    #[test]
    fn test_bar_description_names_year() {
        assert!(bar_description(2013).contains("2013"));
    }
}
