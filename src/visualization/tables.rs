use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::models::{Species, Stand, Tree, TreeStatus};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn title(output: &mut String, text: &str, rule: usize) {
    output.push_str(&format!("\n{}\n", text.bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(rule)));
}

/// Format a stand summary table as a string.
pub fn format_stand_summary(stand: &Stand) -> String {
    let mut output = String::new();
    title(&mut output, "Stand Summary", 50);
    output.push_str(&format!(
        "{}\n",
        format!(
            "Plot: {:.0} m² | {} trees | Age: {}",
            stand.area_m2,
            stand.tree_count,
            if stand.age > 0.0 {
                format!("{:.0} years", stand.age)
            } else {
                "unknown".to_string()
            }
        )
        .dimmed()
    ));

    let mut table = new_table(vec!["Metric", "Value", "Unit"]);

    let rows: [(&str, String, &str); 18] = [
        ("Trees per Hectare", format!("{:.1}", stand.n), "trees/ha"),
        ("  Alive", format!("{:.1}", stand.n_alive), "trees/ha"),
        ("  Dead", format!("{:.1}", stand.n_dead), "trees/ha"),
        ("  Missing", format!("{:.1}", stand.n_missing), "trees/ha"),
        ("  Stump", format!("{:.1}", stand.n_stump), "trees/ha"),
        ("Main Species", stand.main_species.to_string(), ""),
        ("Dominant Trees", stand.dominant_count.to_string(), "trees"),
        ("Dominant Height", format!("{:.2}", stand.dominant_height), "m"),
        ("Dominant Diameter", format!("{:.2}", stand.dominant_diameter), "cm"),
        ("Basal Area", format!("{:.2}", stand.basal_area), "m²/ha"),
        ("Volume", format!("{:.2}", stand.volume), "m³/ha"),
        ("Merchantable Volume", format!("{:.2}", stand.merchantable_volume), "m³/ha"),
        ("Wood Value", format!("{:.2}", stand.wood_value), "per ha"),
        ("Biomass", format!("{:.2}", stand.biomass), "Mg/ha"),
        ("QMD", format!("{:.2}", stand.quadratic_mean_diameter), "cm"),
        ("Wilson Factor", format!("{:.3}", stand.wilson_factor), ""),
        ("SDI", format!("{:.1}", stand.stand_density_index), ""),
        ("Site Index", format!("{:.2}", stand.site_index), "m"),
    ];
    for (metric, value, unit) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value), Cell::new(unit)]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print a formatted stand summary table.
pub fn print_stand_summary(stand: &Stand) {
    print!("{}", format_stand_summary(stand));
}

/// Format the per-tree metrics as a string. Imputed measurements are marked with `*`.
pub fn format_tree_table(trees: &[Tree]) -> String {
    let mut output = String::new();
    title(&mut output, "Tree Metrics", 70);

    let mut table = new_table(vec![
        "ID", "Species", "Status", "DBH", "Height", "g (m²)", "V (m³)", "Vm (m³)", "Value",
        "Biomass (kg)",
    ]);

    let mark = |measured: Option<f64>, estimate: f64| match measured {
        Some(_) => format!("{estimate:.1}"),
        None => format!("{estimate:.1}*"),
    };

    for tree in trees {
        let m = &tree.metrics;
        table.add_row(vec![
            Cell::new(tree.id),
            Cell::new(tree.species),
            Cell::new(tree.status),
            Cell::new(mark(tree.dbh, tree.est_dbh)),
            Cell::new(mark(tree.height, tree.est_height)),
            Cell::new(format!("{:.4}", m.basal_area)),
            Cell::new(format!("{:.4}", m.volume)),
            Cell::new(format!("{:.4}", m.merchantable_volume)),
            Cell::new(format!("{:.2}", m.wood_value)),
            Cell::new(format!("{:.2}", m.biomass.total)),
        ]);
    }

    output.push_str(&format!("{table}"));
    output
}

/// Print the per-tree metrics table.
pub fn print_tree_table(trees: &[Tree]) {
    print!("{}", format_tree_table(trees));
}

/// Format the species and status code reference.
pub fn format_species_reference() -> String {
    let mut output = String::new();
    title(&mut output, "Species", 50);

    let mut species = new_table(vec!["Code", "Common Name", "Scientific Name", "Min DBH (cm)"]);
    for sp in Species::ALL {
        species.add_row(vec![
            Cell::new(sp.code()),
            Cell::new(sp.common_name()),
            Cell::new(sp.scientific_name()),
            Cell::new(format!("{:.1}", sp.min_dbh())),
        ]);
    }
    output.push_str(&format!("{species}\n"));

    title(&mut output, "Status Codes", 50);
    let mut status = new_table(vec!["Code", "Status"]);
    for st in TreeStatus::ALL {
        status.add_row(vec![Cell::new(st.code()), Cell::new(st)]);
    }
    output.push_str(&format!("{status}"));
    output
}

/// Print the species and status code reference.
pub fn print_species_reference() {
    print!("{}", format_species_reference());
}
