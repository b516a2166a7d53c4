use crate::chemistry::elements::Element;
use crate::chemistry::reactions::Reaction;
use crate::resolver::{ReactionSource, Resolution};
use prettytable::{Cell, Row, Table, row};

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

/// one row per element: number, symbol, name, mass, category, period, group
pub fn elements_table(elements: &[&Element]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["No", "Symbol", "Name", "Mass", "Category", "Period", "Group"]);
    for element in elements {
        table.add_row(Row::new(vec![
            Cell::new(&element.atomic_number.to_string()),
            Cell::new(&element.symbol),
            Cell::new(&element.name),
            Cell::new(&format!("{:.3}", element.atomic_mass)),
            Cell::new(element.category.as_str()),
            Cell::new(&element.period.to_string()),
            Cell::new(
                &element
                    .group
                    .map(|group| group.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]));
    }
    table
}

/// property / value table of a single element
pub fn element_table(element: &Element) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Property", "Value"]);
    table.add_row(row!["Symbol", element.symbol]);
    table.add_row(row!["Name", element.name]);
    table.add_row(row!["Atomic number", element.atomic_number]);
    table.add_row(row!["Atomic mass", format!("{:.3}", element.atomic_mass)]);
    table.add_row(row!["Category", element.category]);
    table.add_row(row!["Period", element.period]);
    table.add_row(row![
        "Group",
        element
            .group
            .map(|group| group.to_string())
            .unwrap_or_else(|| "-".to_string())
    ]);
    table.add_row(row!["Electron configuration", element.electron_configuration]);
    table.add_row(row!["Melting point", optional(&element.melting_point)]);
    table.add_row(row!["Boiling point", optional(&element.boiling_point)]);
    table.add_row(row!["Uses", optional(&element.uses)]);
    table.add_row(row!["Fact", optional(&element.fact)]);
    table
}

pub fn reaction_table(reaction: &Reaction, source: ReactionSource) -> Table {
    let source = match source {
        ReactionSource::Curated => "curated library",
        ReactionSource::Ai => "AI analysis",
        ReactionSource::Unavailable => "AI unavailable",
    };
    let mut table = Table::new();
    table.add_row(row!["Field", "Value"]);
    table.add_row(row!["Reactants", reaction.reactants]);
    table.add_row(row!["Product", reaction.product]);
    table.add_row(row!["Name", reaction.product_name]);
    table.add_row(row!["Description", reaction.description]);
    table.add_row(row!["Uses", reaction.uses]);
    table.add_row(row!["Facts", reaction.facts]);
    table.add_row(row!["Source", source]);
    table
}

pub fn resolution_table(resolution: &Resolution) -> Table {
    reaction_table(&resolution.reaction, resolution.source)
}
