use colored::Colorize;

use crate::analysis::DiameterDistribution;

const BAR_WIDTH: usize = 40;

/// Format a text-based histogram of the diameter distribution as a string.
pub fn format_diameter_histogram(dist: &DiameterDistribution) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Diameter Distribution".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if dist.classes.is_empty() {
        output.push_str("  No alive trees.\n");
        return output;
    }

    let max_density = dist
        .classes
        .iter()
        .map(|c| c.density)
        .fold(0.0f64, f64::max);

    output.push_str(&format!(
        "  {:>11}  {:>8}  {:>8}  Distribution\n",
        "DBH (cm)", "N/ha", "G/ha"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(70)));

    for class in &dist.classes {
        let bar_len = if max_density > 0.0 {
            ((class.density / max_density) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "\u{2588}".repeat(bar_len);

        output.push_str(&format!(
            "  {:>5.1}-{:<5.1}  {:>8.1}  {:>8.2}  {}\n",
            class.lower,
            class.upper,
            class.density,
            class.basal_area,
            bar.green()
        ));
    }

    output.push('\n');
    output
}

/// Print a text-based histogram of the diameter distribution.
pub fn print_diameter_histogram(dist: &DiameterDistribution) {
    print!("{}", format_diameter_histogram(dist));
}
